use std::path::PathBuf;

use still_life::{
    SceneDescription, SceneDriver,
    data_structures::{
        light::{Light, LightKind},
        material::Material,
        placement::{ObjectPlacement, ShapeKind},
    },
    error::{ResolveError, SceneError},
    resources::decoder::FlippedImageDecoder,
    scene::{MissingTagPolicy, TextureSource},
};

use crate::common::test_utils::{Call, RecordingBackend, StubDecoder};

mod common;

fn texture(tag: &str, path: &str) -> TextureSource {
    TextureSource {
        tag: tag.to_string(),
        path: PathBuf::from(path),
    }
}

fn small_scene() -> SceneDescription {
    SceneDescription {
        textures: vec![texture("plane", "road.jpg"), texture("cylinder", "wood.jpg")],
        materials: vec![
            Material::new("cement", [0.6; 3], 4.0),
            Material::new("wood", [0.4, 0.25, 0.15], 8.0),
        ],
        lights: vec![
            Light::directional([-0.3, -1.0, -0.2]),
            Light::point([2.0, 6.0, 6.0]),
        ],
        objects: vec![
            ObjectPlacement::textured(ShapeKind::Plane, "cement", "plane"),
            ObjectPlacement::textured(ShapeKind::Cylinder, "wood", "cylinder"),
            ObjectPlacement::solid(ShapeKind::Sphere, "wood", [1.0, 0.0, 0.0, 1.0]),
        ],
        ..SceneDescription::default()
    }
}

fn decoder() -> StubDecoder {
    StubDecoder::new().with_rgb("road.jpg").with_rgb("wood.jpg")
}

#[test]
fn initialize_prepares_everything_before_the_first_frame() {
    let mut backend = RecordingBackend::new();
    let driver = SceneDriver::initialize(&small_scene(), &mut backend, &decoder()).unwrap();

    let creates = backend.count(|c| matches!(c, Call::CreateTexture(_)));
    let first_bind = backend
        .calls
        .iter()
        .position(|c| matches!(c, Call::BindTexture(..)))
        .unwrap();
    let lighting = backend
        .calls
        .iter()
        .position(|c| *c == Call::Bool("bUseLighting".to_string(), true))
        .unwrap();
    let first_mesh = backend
        .calls
        .iter()
        .position(|c| matches!(c, Call::LoadMesh(_)))
        .unwrap();

    assert_eq!(creates, 2);
    assert!(first_bind >= creates && first_bind < lighting && lighting < first_mesh);
    assert_eq!(backend.count(|c| matches!(c, Call::LoadMesh(_))), 6);
    assert!(backend.draws().is_empty());
    assert_eq!(driver.object_count(), 3);
    assert_eq!(driver.registry().material_count(), 2);
}

#[test]
fn render_frame_draws_objects_in_order() {
    let mut backend = RecordingBackend::new();
    let driver = SceneDriver::initialize(&small_scene(), &mut backend, &decoder()).unwrap();
    backend.clear();

    let report = driver.render_frame(&mut backend);

    assert!(report.is_complete());
    assert_eq!(report.drawn, 3);
    assert_eq!(
        backend.draws(),
        vec![ShapeKind::Plane, ShapeKind::Cylinder, ShapeKind::Sphere]
    );

    backend.clear();
    assert_eq!(driver.render_frame(&mut backend), report);
}

#[test]
fn unresolved_tag_fails_initialization_by_default() {
    let mut scene = small_scene();
    scene
        .objects
        .push(ObjectPlacement::textured(ShapeKind::Box, "wood", "marble"));
    let mut backend = RecordingBackend::new();

    let err = SceneDriver::initialize(&scene, &mut backend, &decoder()).unwrap_err();

    match err {
        SceneError::Unresolved { index, source } => {
            assert_eq!(index, 3);
            assert!(matches!(source, ResolveError::TagNotFound { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(backend.live.is_empty(), "textures leaked after failed setup");
}

#[test]
fn skip_policy_reports_missing_objects_each_frame() {
    let mut scene = small_scene();
    scene.missing_tags = MissingTagPolicy::Skip;
    scene.objects.insert(
        1,
        ObjectPlacement::solid(ShapeKind::Cone, "brass", [1.0; 4]),
    );
    let mut backend = RecordingBackend::new();
    let driver = SceneDriver::initialize(&scene, &mut backend, &decoder()).unwrap();
    assert_eq!(driver.unresolved().collect::<Vec<_>>(), vec![1]);
    backend.clear();

    for _ in 0..2 {
        let report = driver.render_frame(&mut backend);
        assert_eq!(report.drawn, 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
    }
    assert!(!backend.draws().contains(&ShapeKind::Cone));
}

#[test]
fn texture_failure_aborts_and_releases_earlier_uploads() {
    let mut scene = small_scene();
    scene.textures.push(texture("pen", "pen.jpg"));
    let mut backend = RecordingBackend::new();

    let err = SceneDriver::initialize(&scene, &mut backend, &decoder()).unwrap_err();

    assert!(matches!(err, SceneError::ImageLoadFailure { .. }));
    assert_eq!(backend.count(|c| matches!(c, Call::CreateTexture(_))), 2);
    assert!(backend.live.is_empty());
    assert_eq!(backend.count(|c| matches!(c, Call::LoadMesh(_))), 0);
}

#[test]
fn texture_capacity_comes_from_the_description() {
    let mut scene = small_scene();
    scene.texture_capacity = 1;
    let mut backend = RecordingBackend::new();

    let err = SceneDriver::initialize(&scene, &mut backend, &decoder()).unwrap_err();

    assert!(matches!(err, SceneError::RegistryFull { capacity: 1, .. }));
}

#[test]
fn too_many_lights_are_rejected() {
    let mut scene = small_scene();
    scene.lights.push(Light::directional([0.0, -1.0, 0.0]));
    let mut backend = RecordingBackend::new();
    let err = SceneDriver::initialize(&scene, &mut backend, &decoder()).unwrap_err();
    assert!(matches!(
        err,
        SceneError::LightLimit {
            kind: LightKind::Directional,
            count: 2,
            max: 1
        }
    ));

    let mut scene = small_scene();
    scene.lights = (0..6).map(|i| Light::point([i as f32, 5.0, 0.0])).collect();
    let mut backend = RecordingBackend::new();
    let err = SceneDriver::initialize(&scene, &mut backend, &decoder()).unwrap_err();
    assert!(matches!(
        err,
        SceneError::LightLimit {
            kind: LightKind::Point,
            count: 6,
            max: 5
        }
    ));
}

#[test]
fn unused_light_slots_are_switched_off() {
    let mut backend = RecordingBackend::new();
    SceneDriver::initialize(&small_scene(), &mut backend, &decoder()).unwrap();

    assert_eq!(
        backend.last("directionalLight.direction"),
        Some(&Call::Vec3(
            "directionalLight.direction".to_string(),
            [-0.3, -1.0, -0.2]
        ))
    );
    assert_eq!(
        backend.last("pointLights[0].bActive"),
        Some(&Call::Bool("pointLights[0].bActive".to_string(), true))
    );
    for i in 1..5 {
        let name = format!("pointLights[{i}].bActive");
        assert_eq!(backend.last(&name), Some(&Call::Bool(name.clone(), false)));
    }
}

#[test]
fn camera_uploads_view_projection_and_eye() {
    let mut backend = RecordingBackend::new();
    let scene = small_scene();
    let driver = SceneDriver::initialize(&scene, &mut backend, &decoder()).unwrap();
    backend.clear();

    driver.apply_camera(&mut backend, 800, 600);

    assert_eq!(
        backend.uniform_names(),
        vec!["view", "projection", "viewPosition"]
    );
    assert_eq!(
        backend.last("view"),
        Some(&Call::Mat4("view".to_string(), scene.camera.view_matrix()))
    );
    assert_eq!(
        backend.last("projection"),
        Some(&Call::Mat4(
            "projection".to_string(),
            scene.camera.projection_matrix(800, 600)
        ))
    );
    assert_eq!(
        backend.last("viewPosition"),
        Some(&Call::Vec3("viewPosition".to_string(), scene.camera.position))
    );
}

#[test]
fn teardown_releases_all_textures() {
    let mut backend = RecordingBackend::new();
    let driver = SceneDriver::initialize(&small_scene(), &mut backend, &decoder()).unwrap();
    assert_eq!(backend.live.len(), 2);

    driver.teardown(&mut backend);

    assert!(backend.live.is_empty());
}

#[test]
fn still_life_renders_completely() {
    let scene = SceneDescription::still_life().unwrap();
    assert_eq!(scene.textures.len(), 9);
    assert_eq!(scene.materials.len(), 8);
    assert_eq!(scene.lights.len(), 4);
    assert_eq!(scene.objects.len(), 18);

    let mut backend = RecordingBackend::new();
    let driver =
        SceneDriver::initialize(&scene, &mut backend, &StubDecoder::accepting_all()).unwrap();
    backend.clear();

    let report = driver.render_frame(&mut backend);

    assert!(report.is_complete());
    assert_eq!(report.drawn, 18);
    assert_eq!(backend.draws().first(), Some(&ShapeKind::Plane));
    assert_eq!(backend.draws().last(), Some(&ShapeKind::Box));
}

#[test]
fn still_life_starts_from_the_shipped_textures() {
    let scene = SceneDescription::still_life().unwrap();
    let decoder = FlippedImageDecoder::new(&scene.asset_root);
    let mut backend = RecordingBackend::new();

    let driver = SceneDriver::initialize(&scene, &mut backend, &decoder).unwrap();

    assert_eq!(driver.registry().texture_count(), scene.textures.len());
    assert_eq!(backend.live.len(), scene.textures.len());
    backend.clear();
    assert!(driver.render_frame(&mut backend).is_complete());
}

#[test]
fn description_fields_have_defaults() {
    let scene = SceneDescription::from_json(
        r#"{
            "materials": [{ "tag": "wood", "diffuse_color": [0.4, 0.25, 0.15], "shininess": 8.0 }],
            "objects": [{ "shape": "tapered_cylinder", "material": "wood", "texture": "solo" }]
        }"#,
    )
    .unwrap();

    assert_eq!(scene.texture_capacity, 16);
    assert_eq!(scene.missing_tags, MissingTagPolicy::Fail);
    let object = &scene.objects[0];
    assert_eq!(object.shape, ShapeKind::TaperedCylinder);
    assert!(object.use_texture);
    assert_eq!(object.scale, [1.0; 3]);
    assert_eq!(object.color, [1.0; 4]);
    assert_eq!(object.uv_scale, [1.0, 1.0]);
}

#[test]
fn bad_descriptions_are_reported() {
    assert!(matches!(
        SceneDescription::from_json("{ \"objects\": 3 }"),
        Err(SceneError::Parse(_))
    ));
    assert!(matches!(
        SceneDescription::from_path("does/not/exist.json"),
        Err(SceneError::Io { .. })
    ));
}
