//! Capture lifecycle and repaint timer ownership, end to end.

use std::time::{Duration, Instant};

use detection_viewer::{
    demo_detections, CameraConfig, DetectionRecord, PaintOp, RecordingSurface, Viewer,
};

const TICK: Duration = Duration::from_millis(100);

fn viewer_on(device: &str, detections: Vec<DetectionRecord>) -> Viewer {
    let camera = CameraConfig {
        device: device.to_string(),
        ..CameraConfig::default()
    };
    Viewer::with_camera(camera, TICK, detections).expect("valid detection list")
}

#[test]
fn stop_before_start_leaves_everything_idle() {
    let mut viewer = viewer_on("stub://front_camera", demo_detections());

    viewer.stop();
    viewer.stop();

    assert!(!viewer.is_detecting());
    assert!(!viewer.timer_armed());
}

#[test]
fn start_flips_detecting_and_arms_exactly_one_timer() {
    let mut viewer = viewer_on("stub://front_camera", demo_detections());

    assert!(viewer.start());
    assert!(viewer.is_detecting());
    assert!(viewer.timer_armed());

    // Starting again must not re-arm or duplicate the timer.
    assert!(viewer.start());
    assert!(viewer.timer_armed());

    viewer.stop();
    assert!(!viewer.is_detecting());
    assert!(!viewer.timer_armed());
}

#[test]
fn acquisition_failure_leaves_no_timer_behind() {
    let mut viewer = viewer_on("stub://denied", demo_detections());

    assert!(!viewer.start());
    assert!(!viewer.is_detecting());
    assert!(!viewer.timer_armed());

    // The render loop never runs for a session that never started.
    assert!(!viewer.pump(Instant::now() + TICK * 5));
}

#[test]
fn repaints_follow_the_detection_list_in_order() {
    let detections = demo_detections();
    let mut viewer = viewer_on("stub://front_camera", detections.clone());
    let surface = RecordingSurface::new(640, 360);
    viewer.attach_surface(Box::new(surface.clone()));

    viewer.start();
    let base = Instant::now();
    assert!(viewer.pump(base + TICK * 2));
    assert!(viewer.pump(base + TICK * 4));

    let ops = surface.ops();
    let frame_len = 1 + detections.len() * 3;
    assert_eq!(ops.len(), frame_len * 2);

    for frame_ops in ops.chunks(frame_len) {
        assert!(matches!(
            frame_ops[0],
            PaintOp::Clear {
                width: 640,
                height: 360
            }
        ));
        for (i, record) in detections.iter().enumerate() {
            let label = record.display_label();
            assert!(matches!(
                frame_ops[1 + i * 3],
                PaintOp::StrokeRect { x, y, .. } if x == record.x && y == record.y
            ));
            assert!(matches!(frame_ops[2 + i * 3], PaintOp::FillRect { .. }));
            assert!(matches!(
                &frame_ops[3 + i * 3],
                PaintOp::FillText { text, .. } if *text == label
            ));
        }
    }
}

#[test]
fn empty_detection_list_paints_only_clears() {
    let mut viewer = viewer_on("stub://front_camera", Vec::new());
    let surface = RecordingSurface::new(640, 360);
    viewer.attach_surface(Box::new(surface.clone()));

    viewer.start();
    assert!(viewer.pump(Instant::now() + TICK * 2));

    assert_eq!(
        surface.ops(),
        vec![PaintOp::Clear {
            width: 640,
            height: 360
        }]
    );
}

#[test]
fn stopping_freezes_the_surface_in_its_last_painted_state() {
    let mut viewer = viewer_on("stub://front_camera", demo_detections());
    let surface = RecordingSurface::new(640, 360);
    viewer.attach_surface(Box::new(surface.clone()));

    viewer.start();
    viewer.pump(Instant::now() + TICK * 2);
    let ops_at_stop = surface.op_count();
    assert!(ops_at_stop > 0);

    viewer.stop();
    for i in 0..10 {
        viewer.pump(Instant::now() + TICK * i);
    }
    assert_eq!(surface.op_count(), ops_at_stop);
}

#[test]
fn restarting_after_stop_paints_again() {
    let mut viewer = viewer_on("stub://front_camera", demo_detections());
    let surface = RecordingSurface::new(640, 360);
    viewer.attach_surface(Box::new(surface.clone()));

    viewer.start();
    viewer.pump(Instant::now() + TICK * 2);
    viewer.stop();
    let ops_after_first_session = surface.op_count();

    assert!(viewer.start());
    assert!(viewer.pump(Instant::now() + TICK * 2));
    assert!(surface.op_count() > ops_after_first_session);
}

#[test]
fn stats_reflect_the_session() {
    let mut viewer = viewer_on("stub://front_camera", demo_detections());
    let surface = RecordingSurface::new(640, 360);
    viewer.attach_surface(Box::new(surface.clone()));

    let idle = viewer.stats();
    assert!(!idle.detecting);
    assert_eq!(idle.frames_painted, 0);
    assert_eq!(idle.objects, 3);

    viewer.start();
    viewer.pump(Instant::now() + TICK * 2);

    let active = viewer.stats();
    assert!(active.detecting);
    assert_eq!(active.frames_painted, 1);
    assert!(active.last_paint.is_some());
    assert_eq!(active.repaint_interval, TICK);
}
