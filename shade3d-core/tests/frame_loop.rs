use std::io::Write;

use shade3d_core::surface::{DrawCall, FixedClock};
use shade3d_core::{
    Color, DepthKey, FrameDriver, FrameState, Mesh, RecordingSurface, RotationState, Scene,
    SceneConfig, Viewport,
};

const CUBE_OBJ: &str = "\
v 0.0 0.0 0.0
v 0.0 1.0 0.0
v 1.0 1.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 1.0
v 1.0 0.0 1.0
v 0.0 1.0 1.0
v 0.0 0.0 1.0
f 1 2 3
f 1 3 4
f 4 3 5
f 4 5 6
f 6 5 7
f 6 7 8
f 8 7 2
f 8 2 1
f 2 7 5
f 2 5 3
f 6 8 1
f 6 1 4
";

fn write_model(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn renders_model_from_disk() {
    let model = write_model(CUBE_OBJ);
    let config = SceneConfig {
        viewport: Viewport::new(800, 600),
        model: Some(model.path().to_path_buf()),
        ..SceneConfig::default()
    };

    let mut driver = FrameDriver::new(config, FixedClock::new(1.0 / 60.0));
    driver
        .start(|config| {
            assert_eq!(config.viewport, Viewport::new(800, 600));
            Ok(RecordingSurface::new(Some(120)))
        })
        .unwrap();

    let stats = driver.run().unwrap();
    assert_eq!(stats.frames, 120);
    assert_eq!(driver.state(), FrameState::Terminated);

    // Every frame is clear, (fill, stroke)*, present
    let calls = driver.surface().unwrap().calls();
    let mut iter = calls.iter();
    let mut frames = 0;
    while let Some(call) = iter.next() {
        assert_eq!(call, &DrawCall::Clear(Color::BLACK));
        loop {
            match iter.next() {
                Some(DrawCall::Fill(fill_points, _)) => match iter.next() {
                    Some(DrawCall::Stroke(points, color, 1)) => {
                        assert_eq!(points, fill_points);
                        assert_eq!(*color, Color::BLACK);
                    }
                    other => panic!("expected outline, got {other:?}"),
                },
                Some(DrawCall::Present) => break,
                other => panic!("unexpected call {other:?}"),
            }
        }
        frames += 1;
    }
    assert_eq!(frames, 120);
}

#[test]
fn malformed_model_never_opens_surface() {
    let model = write_model("v 0 0 0\nv 1 0\n");
    let config = SceneConfig {
        model: Some(model.path().to_path_buf()),
        ..SceneConfig::default()
    };

    let mut driver: FrameDriver<RecordingSurface, FixedClock> =
        FrameDriver::new(config, FixedClock::new(0.1));
    let result = driver.start(|_| panic!("surface must not be opened"));
    assert!(result.is_err());
    assert_eq!(driver.state(), FrameState::Aborted);
}

#[test]
fn draw_order_is_back_to_front_while_tumbling() {
    let mesh = Mesh::unit_cube();
    for key in [DepthKey::Legacy, DepthKey::Centroid] {
        let scene = Scene::new(shade3d_core::Projection::for_viewport(Viewport::default()))
            .with_depth_key(key);
        let mut rotation = RotationState::default();
        for _ in 0..200 {
            let depths: Vec<f64> = scene.frame(&mesh, &rotation).map(|c| c.depth).collect();
            assert!(depths.windows(2).all(|w| w[0] >= w[1]));
            // A closed convex mesh never shows more than three faces
            assert!(depths.len() <= 6);
            rotation.advance(0.05);
        }
    }
}

#[test]
fn frames_are_independent_of_history() {
    let mesh = Mesh::unit_cube();
    let scene = Scene::from_config(&SceneConfig::default());

    let rotation = RotationState::new(2.0);
    let first: Vec<_> = scene.frame(&mesh, &rotation).collect();

    // Render some unrelated frames in between
    for step in 0..10 {
        let _ = scene.frame(&mesh, &RotationState::new(step as f64)).count();
    }

    let second: Vec<_> = scene.frame(&mesh, &rotation).collect();
    assert_eq!(first, second);
}
