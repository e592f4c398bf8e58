//! Save/load round trips for single entities.

use grid_archive::{ArchiveConfig, ArchiveError, BlobCompression, Entity, EntityKind, GridArchive};
use grid_common::{Affine, Crs, DType, Grid, Metadata, MultiRaster, Nodata, Raster, ViewFinder};
use ndarray::{arr2, Array2, Array3, ArrayD, IxDyn};
use serde_json::{json, Value};
use test_utils::{
    create_band_stack, create_elevation_grid, create_grid_with_nans, create_nested_metadata,
    create_sparse_mask, create_test_grid, create_viewfinder, fixtures, init_test_tracing,
    list_file_names, temp_test_dir,
};

fn read_json(path: &std::path::Path) -> Value {
    let text = std::fs::read_to_string(path).expect("Failed to read descriptor");
    serde_json::from_str(&text).expect("Descriptor is not JSON")
}

fn band_metadata() -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("band".to_string(), json!(1));
    metadata
}

fn load_single(archive: &GridArchive, base: &std::path::Path) -> Raster {
    match archive.load_raster(base).expect("Failed to load raster") {
        Entity::Raster(raster) => raster,
        other => panic!("expected a raster, got {:?}", other.kind()),
    }
}

// =============================================================================
// Rasters
// =============================================================================

#[test]
fn test_int32_raster_example() {
    init_test_tracing();
    let dir = temp_test_dir();
    let base = dir.path().join("r");

    let data = Array2::from_shape_vec((3, 3), (1..=9).collect::<Vec<i32>>()).unwrap();
    let viewfinder = ViewFinder::from_shape(
        Affine::from(fixtures::affine::UNIT_NORTH_UP),
        (3, 3),
        Crs::wgs84(),
    )
    .with_nodata(-1_i32);
    let raster = Raster::new(data, viewfinder, band_metadata()).unwrap();

    let archive = GridArchive::default();
    let report = archive.save_raster(&raster, &base).unwrap();
    assert_eq!(report.files.len(), 3);
    assert_eq!(report.objects, vec![(String::new(), EntityKind::Raster)]);

    assert_eq!(
        list_file_names(dir.path()),
        vec!["r_data.npz", "r_mask.npz", "r_raster.json"]
    );

    let descriptor = read_json(&dir.path().join("r_raster.json"));
    assert_eq!(descriptor["type"], "Raster");
    assert_eq!(descriptor["data_shape"], json!([3, 3]));
    assert_eq!(descriptor["data_dtype"], "int32");
    assert_eq!(descriptor["affine"], json!([1.0, 0.0, 0.0, 0.0, -1.0, 3.0]));
    assert_eq!(descriptor["viewfinder_shape"], json!([3, 3]));
    assert_eq!(descriptor["nodata"], json!(-1));
    assert_eq!(descriptor["crs"], "EPSG:4326");
    assert_eq!(descriptor["mask_shape"], json!([3, 3]));
    assert_eq!(descriptor["mask_dtype"], "bool");
    assert_eq!(descriptor["metadata"], json!({"band": 1}));

    let restored = load_single(&archive, &base);
    assert_eq!(restored.dtype(), DType::Int32);
    assert_eq!(restored.nodata(), Nodata::Int32(-1));
    assert!(matches!(restored.nodata(), Nodata::Int32(-1)));
    assert_eq!(restored, raster);
}

#[test]
fn test_every_dtype_roundtrips_with_exact_nodata() {
    let dir = temp_test_dir();
    let archive = GridArchive::default();
    let grid = create_test_grid(4, 5);

    let rasters = vec![
        Raster::new(
            grid.mapv(|v| v as i16),
            create_viewfinder(4, 5).with_nodata(fixtures::nodata::I16_MIN_FILL),
            Metadata::new(),
        ),
        Raster::new(
            grid.clone(),
            create_viewfinder(4, 5).with_nodata(fixtures::nodata::INT_FILL),
            Metadata::new(),
        ),
        Raster::new(
            grid.mapv(|v| v as i64 * 1_000_000_000),
            create_viewfinder(4, 5).with_nodata(i64::MIN),
            Metadata::new(),
        ),
        Raster::new(
            grid.mapv(|v| v as f32 / 3.0),
            create_viewfinder(4, 5).with_nodata(-3.4e38_f32),
            Metadata::new(),
        ),
        Raster::new(
            grid.mapv(|v| v as f64 / 7.0),
            create_viewfinder(4, 5).with_nodata(fixtures::nodata::DEM_FILL),
            Metadata::new(),
        ),
    ];

    for raster in rasters {
        let raster = raster.unwrap();
        let base = dir.path().join(raster.dtype().as_str());
        archive.save_raster(&raster, &base).unwrap();

        let restored = load_single(&archive, &base);
        assert_eq!(restored.dtype(), raster.dtype());
        assert_eq!(restored.nodata().dtype(), Some(raster.dtype()));
        assert_eq!(restored, raster, "dtype {}", raster.dtype());
    }
}

#[test]
fn test_nan_nodata_on_integer_raster() {
    let dir = temp_test_dir();
    let base = dir.path().join("flowdir");
    let raster = Raster::new(create_test_grid(3, 4), create_viewfinder(3, 4), Metadata::new())
        .unwrap();

    let archive = GridArchive::default();
    archive.save_raster(&raster, &base).unwrap();

    let descriptor = read_json(&dir.path().join("flowdir_raster.json"));
    assert_eq!(descriptor["nodata"], "nan");

    let restored = load_single(&archive, &base);
    assert!(restored.nodata().is_nan());
    assert_eq!(restored.dtype(), DType::Int32);
}

#[test]
fn test_infinite_nodata() {
    let dir = temp_test_dir();
    let archive = GridArchive::default();

    for (name, sentinel, marker) in [
        ("pos", f64::INFINITY, "inf"),
        ("neg", f64::NEG_INFINITY, "-inf"),
    ] {
        let base = dir.path().join(name);
        let raster = Raster::new(
            create_elevation_grid(2, 2),
            create_viewfinder(2, 2).with_nodata(sentinel),
            Metadata::new(),
        )
        .unwrap();
        archive.save_raster(&raster, &base).unwrap();

        let descriptor = read_json(&dir.path().join(format!("{}_raster.json", name)));
        assert_eq!(descriptor["nodata"], marker);

        let restored = load_single(&archive, &base);
        assert_eq!(restored.nodata(), Nodata::Float64(sentinel));
    }
}

#[test]
fn test_float_data_with_nan_cells() {
    let dir = temp_test_dir();
    let base = dir.path().join("dem");
    let data = create_grid_with_nans(4, 4, &[(0, 0), (3, 2)]);
    let raster = Raster::new(data.clone(), create_viewfinder(4, 4), Metadata::new()).unwrap();

    let archive = GridArchive::default();
    archive.save_raster(&raster, &base).unwrap();
    let restored = load_single(&archive, &base);

    let values = restored.data().as_array::<f64>().unwrap();
    test_utils::assert_nan_eq!(values.iter(), data.iter());
}

#[test]
fn test_viewfinder_shape_may_differ_from_data_shape() {
    let dir = temp_test_dir();
    let base = dir.path().join("clip");
    let data = arr2(&[[1.5_f32, 2.5], [3.5, 4.5]]);
    let raster = Raster::new(data, create_viewfinder(6, 8), Metadata::new()).unwrap();

    let archive = GridArchive::default();
    archive.save_raster(&raster, &base).unwrap();

    let descriptor = read_json(&dir.path().join("clip_raster.json"));
    assert_eq!(descriptor["data_shape"], json!([2, 2]));
    assert_eq!(descriptor["viewfinder_shape"], json!([6, 8]));
    assert_eq!(load_single(&archive, &base), raster);
}

#[test]
fn test_nested_metadata_preserved() {
    let dir = temp_test_dir();
    let base = dir.path().join("meta");
    let metadata = create_nested_metadata();
    let raster = Raster::new(create_test_grid(2, 2), create_viewfinder(2, 2), metadata.clone())
        .unwrap();

    let archive = GridArchive::default();
    archive.save_raster(&raster, &base).unwrap();
    let restored = load_single(&archive, &base);

    assert_eq!(restored.metadata(), &metadata);
    let keys: Vec<&String> = restored.metadata().keys().collect();
    let expected: Vec<&String> = metadata.keys().collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_three_dimensional_single_raster_keeps_tag() {
    let dir = temp_test_dir();
    let base = dir.path().join("cube");
    let raster = Raster::new(create_band_stack(2, 3, 3), create_viewfinder(3, 3), Metadata::new())
        .unwrap();

    let archive = GridArchive::default();
    archive.save_raster(&raster, &base).unwrap();

    let descriptor = read_json(&dir.path().join("cube_raster.json"));
    assert_eq!(descriptor["type"], "Raster");
    assert_eq!(load_single(&archive, &base), raster);
}

#[test]
fn test_zero_sized_raster() {
    let dir = temp_test_dir();
    let base = dir.path().join("empty");
    let data = ArrayD::<f64>::zeros(IxDyn(&[0, 3]));
    let raster = Raster::new(data, create_viewfinder(0, 3), Metadata::new()).unwrap();

    let archive = GridArchive::default();
    archive.save_raster(&raster, &base).unwrap();
    let restored = load_single(&archive, &base);
    assert_eq!(restored.shape(), &[0, 3]);
    assert_eq!(restored.viewfinder().shape(), (0, 3));
}

// =============================================================================
// Multi-rasters
// =============================================================================

#[test]
fn test_multi_raster_roundtrip() {
    let dir = temp_test_dir();
    let base = dir.path().join("stack");
    let stack: Array3<f32> = create_band_stack(3, 4, 5);
    let mut metadata = Metadata::new();
    metadata.insert("bands".to_string(), json!(["red", "green", "blue"]));
    let multi = MultiRaster::new(
        stack,
        create_viewfinder(4, 5).with_nodata(-1.0_f32),
        metadata,
    )
    .unwrap();

    let archive = GridArchive::default();
    archive.save_multi_raster(&multi, &base).unwrap();

    let descriptor = read_json(&dir.path().join("stack_raster.json"));
    assert_eq!(descriptor["type"], "MultiRaster");
    assert_eq!(descriptor["data_shape"], json!([3, 4, 5]));

    let restored = match archive.load_raster(&base).unwrap() {
        Entity::MultiRaster(multi) => multi,
        other => panic!("expected a multi-raster, got {:?}", other.kind()),
    };
    assert_eq!(restored.band_count(), 3);
    assert_eq!(restored, multi);

    let band = restored.band(2).unwrap();
    let values = band.data().as_array::<f32>().unwrap();
    assert_eq!(values[[1, 4]], 214.0);
}

// =============================================================================
// Grids
// =============================================================================

#[test]
fn test_grid_roundtrip_with_mask_and_nan() {
    let dir = temp_test_dir();
    let base = dir.path().join("g");
    let viewfinder = ViewFinder::new(
        Affine::from(fixtures::affine::UTM_30M),
        (6, 7),
        Nodata::NotANumber,
        fixtures::crs::UTM_33N_PROJ.parse().unwrap(),
        create_sparse_mask(6, 7, 11),
    )
    .unwrap();
    let grid = Grid::new(viewfinder).unwrap();

    let archive = GridArchive::default();
    archive.save_grid(&grid, &base).unwrap();
    assert_eq!(list_file_names(dir.path()), vec!["g_grid.json", "g_mask.npz"]);

    let descriptor = read_json(&dir.path().join("g_grid.json"));
    assert_eq!(descriptor["type"], "sGrid");
    assert_eq!(descriptor["shape"], json!([6, 7]));
    assert_eq!(descriptor["nodata"], "nan");
    assert!(descriptor.get("data_dtype").is_none());

    let restored = archive.load_grid(&base).unwrap();
    assert_eq!(restored, grid);
    assert_eq!(
        restored.viewfinder().affine().coefficients(),
        fixtures::affine::UTM_30M
    );
    assert_eq!(restored.viewfinder().mask(), grid.viewfinder().mask());
}

#[test]
fn test_grid_with_numeric_nodata_and_rotation() {
    let dir = temp_test_dir();
    let base = dir.path().join("rot");
    let viewfinder = ViewFinder::from_shape(
        Affine::from(fixtures::affine::ROTATED),
        (3, 3),
        fixtures::crs::WGS84_WKT.parse().unwrap(),
    )
    .with_nodata(-9999.0_f64);
    let grid = Grid::new(viewfinder).unwrap();

    let archive = GridArchive::default();
    archive.save_grid(&grid, &base).unwrap();
    let restored = archive.load_grid(&base).unwrap();

    assert_eq!(restored.viewfinder().nodata(), Nodata::Float64(-9999.0));
    assert_eq!(
        restored.viewfinder().crs(),
        &Crs::Other(fixtures::crs::WGS84_WKT.to_string())
    );
    assert_eq!(restored, grid);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_stored_compression_and_compact_json() {
    let dir = temp_test_dir();
    let base = dir.path().join("plain");
    let config = ArchiveConfig {
        compression: BlobCompression::Stored,
        pretty_json: false,
        atomic_writes: false,
        ..ArchiveConfig::default()
    };
    let archive = GridArchive::new(config).unwrap();
    let raster = Raster::new(create_test_grid(8, 8), create_viewfinder(8, 8), Metadata::new())
        .unwrap();

    archive.save_raster(&raster, &base).unwrap();

    let text = std::fs::read_to_string(dir.path().join("plain_raster.json")).unwrap();
    assert_eq!(text.lines().count(), 1);
    // Loading does not depend on the writer's configuration
    assert_eq!(load_single(&GridArchive::default(), &base), raster);
}

#[test]
fn test_nested_base_directory_is_created() {
    let dir = temp_test_dir();
    let base = dir.path().join("a").join("b").join("dem");
    let raster = Raster::new(create_test_grid(2, 2), create_viewfinder(2, 2), Metadata::new())
        .unwrap();

    grid_archive::save_raster(&raster, &base).unwrap();
    assert!(dir.path().join("a/b/dem_raster.json").exists());
    assert!(matches!(
        grid_archive::load_raster(&base).unwrap(),
        Entity::Raster(_)
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let config = ArchiveConfig {
        temp_suffix: String::new(),
        ..ArchiveConfig::default()
    };
    assert!(matches!(GridArchive::new(config), Err(ArchiveError::Config(_))));
}

#[test]
fn test_failed_single_save_leaves_no_files() {
    let dir = temp_test_dir();
    let base = dir.path().join("r");
    // A directory on the descriptor's temp path makes the last write fail
    std::fs::create_dir(dir.path().join("r_raster.json.tmp")).unwrap();

    let raster = Raster::new(create_test_grid(2, 2), create_viewfinder(2, 2), Metadata::new())
        .unwrap();
    let result = GridArchive::default().save_raster(&raster, &base);

    assert!(result.is_err());
    assert_eq!(list_file_names(dir.path()), vec!["r_raster.json.tmp"]);
}

#[test]
fn test_failed_resave_does_not_leave_stale_descriptor() {
    let dir = temp_test_dir();
    let base = dir.path().join("r");
    let archive = GridArchive::default();
    let raster = Raster::new(create_test_grid(2, 2), create_viewfinder(2, 2), Metadata::new())
        .unwrap();
    archive.save_raster(&raster, &base).unwrap();

    // Second save fails after the data blob has been overwritten
    std::fs::create_dir(dir.path().join("r_mask.npz.tmp")).unwrap();
    assert!(archive.save_raster(&raster, &base).is_err());

    assert_eq!(list_file_names(dir.path()), vec!["r_mask.npz", "r_mask.npz.tmp"]);
    match archive.load_raster(&base).unwrap_err() {
        ArchiveError::NotFound { path } => assert!(path.ends_with("r_raster.json")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

// =============================================================================
// Values without a faithful text form
// =============================================================================

#[test]
fn test_non_finite_affine_rejected_before_writing() {
    let dir = temp_test_dir();
    let archive = GridArchive::default();

    for (name, bad) in [("nan", f64::NAN), ("inf", f64::INFINITY)] {
        let viewfinder = ViewFinder::from_shape(
            Affine::new(bad, 0.0, 0.0, 0.0, -1.0, 0.0),
            (2, 2),
            Crs::wgs84(),
        );
        let raster = Raster::new(create_test_grid(2, 2), viewfinder.clone(), Metadata::new())
            .unwrap();
        let err = archive.save_raster(&raster, dir.path().join(name)).unwrap_err();
        assert!(matches!(err, ArchiveError::Format(_)), "{}: {:?}", name, err);

        let grid = Grid::new(viewfinder).unwrap();
        let err = archive.save_grid(&grid, dir.path().join(name)).unwrap_err();
        assert!(matches!(err, ArchiveError::Format(_)), "{}: {:?}", name, err);
    }
    assert!(list_file_names(dir.path()).is_empty());
}

#[test]
fn test_non_canonical_crs_rejected_before_writing() {
    let dir = temp_test_dir();
    let archive = GridArchive::default();

    for crs in [Crs::Other(String::new()), Crs::Other("EPSG:4326".to_string())] {
        let viewfinder = ViewFinder::from_shape(
            Affine::from(fixtures::affine::UNIT_NORTH_UP),
            (2, 2),
            crs.clone(),
        );
        let raster = Raster::new(create_test_grid(2, 2), viewfinder, Metadata::new()).unwrap();
        let err = archive.save_raster(&raster, dir.path().join("r")).unwrap_err();
        assert!(matches!(err, ArchiveError::Format(_)), "{:?}: {:?}", crs, err);
    }
    assert!(list_file_names(dir.path()).is_empty());
}

#[test]
fn test_parsed_crs_roundtrips_in_canonical_form() {
    let dir = temp_test_dir();
    let base = dir.path().join("world");
    let crs: Crs = fixtures::crs::INIT_4326.parse().unwrap();
    let viewfinder = ViewFinder::from_shape(
        Affine::from(fixtures::affine::GLOBAL_QUARTER_DEGREE),
        (720, 1440),
        crs,
    );
    let grid = Grid::new(viewfinder).unwrap();

    let archive = GridArchive::default();
    archive.save_grid(&grid, &base).unwrap();

    let descriptor = read_json(&dir.path().join("world_grid.json"));
    assert_eq!(descriptor["crs"], "EPSG:4326");
    assert_eq!(archive.load_grid(&base).unwrap(), grid);
}
