use super::*;

struct FakeVideo {
    duration: f64,
    seeks: Vec<f64>,
    fail_at: Option<usize>,
    delay: Duration,
}

impl FakeVideo {
    fn new(duration: f64) -> Self {
        Self {
            duration,
            seeks: Vec::new(),
            fail_at: None,
            delay: Duration::ZERO,
        }
    }
}

impl VideoSource for FakeVideo {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn size(&self) -> (u32, u32) {
        (4, 2)
    }

    fn frame_at(&mut self, time_s: f64) -> MediaResult<RasterSource> {
        if self.fail_at == Some(self.seeks.len()) {
            return Err(MediaError::decode("corrupt packet"));
        }
        self.seeks.push(time_s);
        std::thread::sleep(self.delay);
        RasterSource::solid(4, 2, [self.seeks.len() as u8, 0, 0, 255])
    }
}

struct FakeDoc {
    pages: u32,
    rendered: Vec<(u32, f64)>,
}

impl PageSource for FakeDoc {
    fn page_count(&self) -> u32 {
        self.pages
    }

    fn render_page(&mut self, index: u32, scale: f64) -> MediaResult<RasterSource> {
        self.rendered.push((index, scale));
        if index == 2 {
            return Err(MediaError::decode("bad xref"));
        }
        RasterSource::solid(2, 3, [0, 0, 0, 255])
    }
}

#[test]
fn samples_are_sequential_and_numbered_from_one() {
    let mut v = FakeVideo::new(5.0);
    let frames = sample_video(&mut v, &SampleOpts::default()).unwrap();
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[0].number, 1);
    assert_eq!(frames[4].number, 5);
    assert!(v.seeks.windows(2).all(|w| w[0] < w[1]));
    assert!((v.seeks[0] - 5.0 / 6.0).abs() < 1e-12);
    assert_eq!(frames[2].raster.pixel(0, 0), Some([3, 0, 0, 255]));
}

#[test]
fn zero_duration_is_not_an_error() {
    let mut v = FakeVideo::new(0.0);
    assert!(sample_video(&mut v, &SampleOpts::default()).unwrap().is_empty());
    assert!(v.seeks.is_empty());
}

#[test]
fn decode_failure_stops_the_asset() {
    let mut v = FakeVideo::new(4.0);
    v.fail_at = Some(2);
    let err = sample_video(&mut v, &SampleOpts::default()).unwrap_err();
    assert!(matches!(err, MediaError::Decode(_)));
    assert_eq!(v.seeks.len(), 2);
}

#[test]
fn cancelled_token_stops_before_seeking() {
    let opts = SampleOpts::default();
    opts.cancel.cancel();
    let mut v = FakeVideo::new(3.0);
    let err = sample_video(&mut v, &opts).unwrap_err();
    assert!(matches!(err, MediaError::Cancelled));
    assert!(v.seeks.is_empty());
}

#[test]
fn slow_seek_times_out() {
    let opts = SampleOpts {
        op_timeout: Some(Duration::from_millis(1)),
        ..SampleOpts::default()
    };
    let mut v = FakeVideo::new(2.0);
    v.delay = Duration::from_millis(30);
    let err = sample_video(&mut v, &opts).unwrap_err();
    assert!(matches!(err, MediaError::TimedOut(_)));
}

#[test]
fn poster_uses_one_second_mark() {
    let mut v = FakeVideo::new(8.0);
    capture_poster(&mut v, &SampleOpts::default()).unwrap();
    assert_eq!(v.seeks, vec![1.0]);

    let mut short = FakeVideo::new(0.5);
    capture_poster(&mut short, &SampleOpts::default()).unwrap();
    assert_eq!(short.seeks, vec![0.5]);
}

#[test]
fn pages_render_in_order_and_abort_on_first_failure() {
    let mut ok = FakeDoc {
        pages: 2,
        rendered: Vec::new(),
    };
    let pages = rasterize_pages(&mut ok, 2.0, &SampleOpts::default()).unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].number, 2);
    assert_eq!(ok.rendered, vec![(0, 2.0), (1, 2.0)]);

    let mut bad = FakeDoc {
        pages: 5,
        rendered: Vec::new(),
    };
    assert!(rasterize_pages(&mut bad, 2.0, &SampleOpts::default()).is_err());
    assert_eq!(bad.rendered.len(), 3);
}

#[test]
fn invalid_page_scale_is_rejected() {
    let mut doc = FakeDoc {
        pages: 1,
        rendered: Vec::new(),
    };
    assert!(rasterize_pages(&mut doc, 0.0, &SampleOpts::default()).is_err());
    assert!(doc.rendered.is_empty());
}
