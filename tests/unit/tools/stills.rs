use super::*;
use crate::fixtures::{FakeVideoOpener, png_input, video_input};
use crate::foundation::cancel::CancelToken;

fn stills_with(opener: FakeVideoOpener, sample: SampleOpts) -> VideoStills {
    VideoStills::new(Arc::new(opener), sample, BatchThreading::default())
}

#[test]
fn only_videos_are_queued_with_sanitized_names() {
    let mut s = stills_with(FakeVideoOpener::with_duration(2.0), SampleOpts::default());
    let added = s.add(vec![
        video_input("My Clip.final.mp4"),
        png_input("a.png", 2, 2, [0, 0, 0, 255]),
    ]);
    assert_eq!(added, 1);
    assert_eq!(s.videos()[0].name, "My_Clip.final");
    assert_eq!(s.videos()[0].status, AssetStatus::Pending);
}

#[test]
fn stills_follow_the_sampling_policy_in_order() {
    let opener = FakeVideoOpener::with_duration(3.0);
    let seeks = Arc::clone(&opener.seeks);
    let mut s = stills_with(opener, SampleOpts::default());
    s.add(vec![video_input("clip.mp4")]);
    let summary = s.process().unwrap();
    assert_eq!(summary.processed, 1);

    assert_eq!(*seeks.lock().unwrap(), vec![0.75, 1.5, 2.25]);
    let v = &s.videos()[0];
    let numbers: Vec<_> = v.stills.iter().map(|st| st.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(&v.stills[0].bytes[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&v.stills[0].bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 6));
}

#[test]
fn short_videos_yield_no_stills() {
    let mut s = stills_with(FakeVideoOpener::with_duration(0.5), SampleOpts::default());
    s.add(vec![video_input("blip.mp4")]);
    s.process().unwrap();
    assert_eq!(s.videos()[0].status, AssetStatus::Ready);
    assert!(s.videos()[0].stills.is_empty());
    assert!(s.export_entries().is_empty());
}

#[test]
fn failures_stay_local_and_ready_videos_are_skipped() {
    let opener = FakeVideoOpener::with_duration(2.0);
    let seeks = Arc::clone(&opener.seeks);
    let mut s = stills_with(opener, SampleOpts::default());
    s.add(vec![video_input("broken.mp4"), video_input("good.mp4")]);

    let first = s.process().unwrap();
    assert_eq!((first.processed, first.failed), (1, 1));
    assert!(s.videos()[0].status.is_failed());
    assert_eq!(seeks.lock().unwrap().len(), 2);

    let second = s.process().unwrap();
    assert_eq!(second.skipped, 1);
    assert_eq!(second.failed, 1);
    assert_eq!(seeks.lock().unwrap().len(), 2);

    let names: Vec<_> = s.export_entries().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["good/1.jpg", "good/2.jpg"]);
}

#[test]
fn cancellation_leaves_videos_pending() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let sample = SampleOpts {
        cancel,
        op_timeout: None,
    };
    let mut s = stills_with(FakeVideoOpener::with_duration(4.0), sample);
    s.add(vec![video_input("clip.mp4")]);
    assert!(matches!(s.process(), Err(MediaError::Cancelled)));
    assert_eq!(s.videos()[0].status, AssetStatus::Pending);
}

#[test]
fn remove_drops_stills() {
    let mut s = stills_with(FakeVideoOpener::with_duration(2.0), SampleOpts::default());
    s.add(vec![video_input("a.mp4"), video_input("b.mp4")]);
    s.process().unwrap();
    let id = s.videos()[0].id;
    assert!(s.remove(id));
    assert_eq!(s.export_entries().len(), 2);
    assert!(s.export_entries()[0].name.starts_with("b/"));
}

#[test]
fn stills_hold_previews_until_their_video_goes() {
    let mut s = stills_with(FakeVideoOpener::with_duration(3.0), SampleOpts::default());
    s.add(vec![video_input("a.mp4"), video_input("b.mp4")]);
    s.process().unwrap();
    assert_eq!(s.live_previews(), 6);
    assert_eq!(s.videos()[0].stills[0].preview().size(), (8, 6));

    let id = s.videos()[0].id;
    assert!(s.remove(id));
    assert_eq!(s.live_previews(), 3);
    s.clear();
    assert_eq!(s.live_previews(), 0);
    assert!(s.videos().is_empty());
}
