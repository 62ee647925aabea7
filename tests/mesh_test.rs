use cgmath::{InnerSpace, Vector3};
use still_life::{
    data_structures::{placement::ShapeKind, texture},
    resources::{
        decoder::{DecodedImage, FlippedImageDecoder, ImageDecoder},
        mesh::MeshData,
    },
};

fn bounds(mesh: &MeshData) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for v in &mesh.vertices {
        for axis in 0..3 {
            min[axis] = min[axis].min(v.position[axis]);
            max[axis] = max[axis].max(v.position[axis]);
        }
    }
    (min, max)
}

fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-5, "expected {expected:?}, got {actual:?}");
    }
}

#[test]
fn every_shape_is_a_valid_triangle_list() {
    for shape in ShapeKind::ALL {
        let mesh = MeshData::for_shape(shape);
        assert!(!mesh.indices.is_empty(), "{shape:?} has no triangles");
        assert_eq!(mesh.indices.len() % 3, 0, "{shape:?}");
        assert!(
            mesh.indices
                .iter()
                .all(|&i| (i as usize) < mesh.vertices.len()),
            "{shape:?} indexes past its vertices"
        );
        for v in &mesh.vertices {
            let length = Vector3::from(v.normal).magnitude();
            assert!((length - 1.0).abs() < 1e-4, "{shape:?} normal {:?}", v.normal);
        }
    }
}

#[test]
fn triangles_face_along_their_normals() {
    for shape in ShapeKind::ALL {
        let mesh = MeshData::for_shape(shape);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| &mesh.vertices[i as usize]);
            let pa = Vector3::from(a.position);
            let face = (Vector3::from(b.position) - pa).cross(Vector3::from(c.position) - pa);
            let normal = Vector3::from(a.normal) + Vector3::from(b.normal) + Vector3::from(c.normal);
            assert!(face.dot(normal) >= -1e-6, "{shape:?} has a back-facing triangle");
        }
    }
}

#[test]
fn unit_shapes_have_the_expected_extents() {
    let (min, max) = bounds(&MeshData::for_shape(ShapeKind::Plane));
    assert_close(min, [-1.0, 0.0, -1.0]);
    assert_close(max, [1.0, 0.0, 1.0]);

    let (min, max) = bounds(&MeshData::for_shape(ShapeKind::Box));
    assert_close(min, [-0.5; 3]);
    assert_close(max, [0.5; 3]);

    let (min, max) = bounds(&MeshData::for_shape(ShapeKind::Sphere));
    assert_close(min, [-1.0; 3]);
    assert_close(max, [1.0; 3]);

    for shape in [ShapeKind::Cylinder, ShapeKind::Cone, ShapeKind::TaperedCylinder] {
        let (min, max) = bounds(&MeshData::for_shape(shape));
        assert_close(min, [-1.0, 0.0, -1.0]);
        assert_close(max, [1.0; 3]);
    }
}

#[test]
fn tapered_shapes_narrow_towards_the_top() {
    let top_radius = |shape| {
        MeshData::for_shape(shape)
            .vertices
            .iter()
            .filter(|v| (v.position[1] - 1.0).abs() < 1e-6)
            .map(|v| (v.position[0].powi(2) + v.position[2].powi(2)).sqrt())
            .fold(0.0f32, f32::max)
    };
    assert!((top_radius(ShapeKind::Cylinder) - 1.0).abs() < 1e-5);
    assert!((top_radius(ShapeKind::TaperedCylinder) - 0.5).abs() < 1e-5);
    assert!(top_radius(ShapeKind::Cone) < 1e-5);
}

#[test]
fn mip_chain_reaches_one_pixel() {
    assert_eq!(texture::mip_level_count(1, 1), 1);
    assert_eq!(texture::mip_level_count(256, 256), 9);
    assert_eq!(texture::mip_level_count(300, 200), 9);
    assert_eq!(texture::mip_level_count(1024, 1), 11);
}

#[test]
fn rgb_pixels_gain_an_opaque_alpha() {
    let image = DecodedImage {
        pixels: vec![10, 20, 30, 40, 50, 60],
        width: 2,
        height: 1,
        channels: 3,
    };
    assert_eq!(
        texture::expand_to_rgba(&image),
        vec![10, 20, 30, 255, 40, 50, 60, 255]
    );
}

#[test]
fn decoder_flips_images_vertically() {
    let root = std::env::temp_dir().join(format!("still-life-decoder-{}", std::process::id()));
    std::fs::create_dir_all(&root).unwrap();
    // top row red, bottom row blue
    let image = image::RgbImage::from_fn(1, 2, |_, y| {
        if y == 0 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    });
    image.save(root.join("stripes.png")).unwrap();

    let decoded = FlippedImageDecoder::new(&root)
        .decode(std::path::Path::new("stripes.png"))
        .unwrap();

    assert_eq!((decoded.width, decoded.height, decoded.channels), (1, 2, 3));
    assert_eq!(&decoded.pixels[0..3], &[0, 0, 255]);
    assert_eq!(&decoded.pixels[3..6], &[255, 0, 0]);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn decoder_reports_missing_files() {
    let decoder = FlippedImageDecoder::new("definitely/not/here");
    assert!(matches!(
        decoder.decode(std::path::Path::new("nothing.jpg")),
        Err(still_life::SceneError::ImageLoadFailure { .. })
    ));
}
