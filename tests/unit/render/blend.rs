use super::*;

#[test]
fn opaque_source_replaces_exactly() {
    assert_eq!(over([10, 20, 30, 255], [200, 100, 50, 255], 1.0), [200, 100, 50, 255]);
}

#[test]
fn transparent_source_or_zero_opacity_is_identity() {
    let dst = [1, 2, 3, 4];
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 255], 0.0), dst);
}

#[test]
fn half_opacity_mixes() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert_eq!(out[3], 255);
    assert!((126..=130).contains(&out[0]), "{out:?}");
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    assert!(matches!(
        over_in_place(&mut dst, &[0u8; 7], 1.0),
        Err(UnderlayError::Render(_))
    ));
}

#[test]
fn blit_same_size_is_exact() {
    let canvas = Canvas::new(2, 1);
    let raster = Raster::from_premul(2, 1, vec![9, 8, 7, 255, 0, 0, 0, 0]).unwrap();
    let mut dst = [50u8, 50, 50, 255].repeat(2);
    blit_stretched(&mut dst, canvas, &raster).unwrap();
    assert_eq!(dst, vec![9, 8, 7, 255, 50, 50, 50, 255]);
}

#[test]
fn solid_raster_stretches_to_solid() {
    let canvas = Canvas::new(8, 6);
    let raster = Raster::solid(3, 2, [0, 0, 255, 255]);
    let out = resample_premul(&raster, canvas).unwrap();
    assert_eq!(out.len(), canvas.byte_len());
    assert!(out.chunks_exact(4).all(|px| px == [0, 0, 255, 255]));
}
