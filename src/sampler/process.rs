use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::assets::decode::AssetInput;
use crate::foundation::error::{MediaError, MediaResult};

static STAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// A file path the external tools can read; in-memory inputs are written to a temp file that
/// is removed on drop.
pub(crate) struct StagedInput {
    path: PathBuf,
    owned: bool,
}

impl StagedInput {
    pub(crate) fn new(input: &AssetInput) -> MediaResult<Self> {
        if let Some(p) = &input.origin
            && p.is_file()
        {
            return Ok(Self {
                path: p.clone(),
                owned: false,
            });
        }

        let seq = STAGE_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "mediakit-{}-{seq}.{}",
            std::process::id(),
            input.extension()
        ));
        std::fs::write(&path, input.bytes.as_slice())?;
        Ok(Self { path, owned: true })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedInput {
    fn drop(&mut self) {
        if self.owned {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Run `cmd` to completion and return its stdout.
///
/// A non-zero exit is a decode failure carrying stderr; exceeding `timeout` kills the child.
pub(crate) fn run_captured(
    mut cmd: Command,
    timeout: Option<Duration>,
    what: &str,
) -> MediaResult<Vec<u8>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| MediaError::decode(format!("failed to run {what}: {e}")))?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| MediaError::decode(format!("{what}: stdout not captured")))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| MediaError::decode(format!("{what}: stderr not captured")))?;
    let out_drain = std::thread::spawn(move || {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).map(|_| buf)
    });
    let err_drain = std::thread::spawn(move || {
        let mut buf = Vec::new();
        stderr.read_to_end(&mut buf).map(|_| buf)
    });

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if let Some(limit) = timeout
            && start.elapsed() > limit
        {
            let _ = child.kill();
            let _ = child.wait();
            return Err(MediaError::timed_out(format!(
                "{what} exceeded {}ms",
                limit.as_millis()
            )));
        }
        std::thread::sleep(Duration::from_millis(5));
    };

    let stdout = out_drain
        .join()
        .map_err(|_| MediaError::decode(format!("{what}: stdout drain panicked")))??;
    let stderr = err_drain
        .join()
        .map_err(|_| MediaError::decode(format!("{what}: stderr drain panicked")))??;

    if !status.success() {
        return Err(MediaError::decode(format!(
            "{what} failed: {}",
            String::from_utf8_lossy(&stderr).trim()
        )));
    }
    Ok(stdout)
}
