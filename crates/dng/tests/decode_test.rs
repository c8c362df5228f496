//! Container walking, tag dumps and segment decoding on synthetic files

mod common;

use common::{DngBuilder, Layout, Value};
use dng::{tags, DngDecoder, DngError, TagValue, TiffContainer};
use dng_core::consts::MAX_DIRECTORIES;

/// 12-bit samples with structure in both directions
fn gradient(width: u32, height: u32) -> Vec<u16> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x * 397 + y * 1021 + (x * y) % 7) % 4096) as u16))
        .collect()
}

#[test]
fn test_dump_lists_main_and_raw_directories() {
    let data = DngBuilder::mosaic(8, 4, gradient(8, 4)).build();
    let container = TiffContainer::parse(&data).unwrap();
    assert!(container.problems.is_empty());

    let dump = container.dump();
    assert_eq!(dump.len(), 2);
    assert!(!dump[0].is_raw);
    assert!(dump[1].is_raw);
    assert_eq!(dump[1].parent_offset, Some(dump[0].offset));

    let model = dump[0]
        .entries
        .iter()
        .find(|e| e.tag == tags::UNIQUE_CAMERA_MODEL)
        .unwrap();
    assert_eq!(model.name, Some("UniqueCameraModel"));
    assert_eq!(model.value, TagValue::Ascii("Synthetic Test Camera".to_string()));

    let text = dump[1].to_string();
    assert!(text.contains("[raw]"));
    assert!(text.contains("Compression (259): U16 x1 = [7]"));
}

#[test]
fn test_segments_recover_samples_for_every_predictor() {
    let samples = gradient(8, 6);
    for predictor in 1..=7 {
        let data = DngBuilder::mosaic(8, 6, samples.clone())
            .predictor(predictor)
            .layout(Layout::Strips { rows_per_strip: 4 })
            .build();
        let decoder = DngDecoder::new(&data).unwrap();
        let segments = decoder.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!((segments[1].y0, segments[1].y1), (4, 6));

        for segment in segments {
            let planes = decoder
                .linearizer()
                .sample_image_segment(decoder.container(), segment)
                .unwrap();
            assert_eq!(planes.len(), 1);
            let start = (segment.y0 * 8) as usize;
            let end = (segment.y1 * 8) as usize;
            assert_eq!(planes[0].data(), &samples[start..end], "predictor {predictor}");
        }
    }
}

#[test]
fn test_two_component_stream_fills_one_plane() {
    let samples = gradient(8, 4);
    let data = DngBuilder::mosaic(8, 4, samples.clone())
        .jpeg_components(2)
        .build();
    let decoder = DngDecoder::new(&data).unwrap();
    let segment = decoder.segments()[0];
    let planes = decoder
        .linearizer()
        .sample_image_segment(decoder.container(), &segment)
        .unwrap();
    assert_eq!(planes[0].width(), 8);
    assert_eq!(planes[0].data(), samples.as_slice());
}

#[test]
fn test_tiles_cover_image_past_edges() {
    let data = DngBuilder::mosaic(10, 6, gradient(10, 6))
        .layout(Layout::Tiles { width: 4, length: 4 })
        .build();
    let decoder = DngDecoder::new(&data).unwrap();
    let segments = decoder.segments();
    assert_eq!(segments.len(), 6);
    assert_eq!((segments[2].x0, segments[2].x1), (8, 12));
    assert_eq!((segments[5].y0, segments[5].y1), (4, 8));

    let mut hits = vec![0u32; 10 * 6];
    for s in segments {
        for y in s.y0..s.y1.min(6) {
            for x in s.x0..s.x1.min(10) {
                hits[(y * 10 + x) as usize] += 1;
            }
        }
    }
    assert!(hits.iter().all(|&n| n == 1));

    let planes = decoder.decode_segment(&segments[5]).unwrap();
    assert_eq!((planes[0].width(), planes[0].height()), (4, 4));
}

#[test]
fn test_linearize_against_black_and_white() {
    let data = DngBuilder::mosaic(4, 2, vec![64, 4095, 2079, 0, 64, 64, 64, 64])
        .raw_tag(tags::BLACK_LEVEL, Value::Short(vec![64]))
        .build();
    let decoder = DngDecoder::new(&data).unwrap();
    assert_eq!(decoder.linearizer().max_black_level(), &[64.0]);

    let planes = decoder.decode_segment(&decoder.segments()[0]).unwrap();
    let row = planes[0].row(0);
    assert_eq!(row[0], 0.0);
    assert_eq!(row[1], 1.0);
    assert!((row[2] - 2015.0 / 4031.0).abs() < 1e-6);
    // Below black stays negative
    assert!(row[3] < 0.0);
}

#[test]
fn test_raw_in_first_directory() {
    let data = DngBuilder::mosaic(4, 2, gradient(4, 2)).raw_in_ifd0().build();
    let decoder = DngDecoder::new(&data).unwrap();
    assert_eq!(decoder.raw_directory_index(), 0);
    assert!(decoder.raw_directory().is_raw());
}

#[test]
fn test_no_raw_directory() {
    let data = DngBuilder::mosaic(4, 2, gradient(4, 2))
        .raw_tag(tags::NEW_SUBFILE_TYPE, Value::Long(vec![1]))
        .build();
    assert!(matches!(DngDecoder::new(&data), Err(DngError::NoRawDirectory)));
}

#[test]
fn test_uncompressed_raw_is_unsupported() {
    let data = DngBuilder::mosaic(4, 2, gradient(4, 2))
        .raw_tag(tags::COMPRESSION, Value::Short(vec![1]))
        .build();
    assert!(matches!(
        DngDecoder::new(&data),
        Err(DngError::UnsupportedFeature(_))
    ));
}

#[test]
fn test_self_referential_chain_is_bounded() {
    let data = DngBuilder::mosaic(4, 2, gradient(4, 2))
        .raw_in_ifd0()
        .self_referential()
        .build();
    let decoder = DngDecoder::new(&data).unwrap();
    assert_eq!(decoder.container().directories.len(), MAX_DIRECTORIES);
    assert!(decoder.problems().iter().any(|p| p.contains("directory limit")));
    assert_eq!(decoder.raw_directory_index(), MAX_DIRECTORIES - 1);
}

#[test]
fn test_corrupt_segment_names_position() {
    let data = DngBuilder::mosaic(4, 4, gradient(4, 4))
        .layout(Layout::Strips { rows_per_strip: 2 })
        .corrupt_segment(1)
        .build();
    let decoder = DngDecoder::new(&data).unwrap();
    assert!(decoder.decode_segment(&decoder.segments()[0]).is_ok());
    let err = decoder.decode_segment(&decoder.segments()[1]).unwrap_err();
    assert!(matches!(err, DngError::Segment { x0: 0, y0: 2, .. }));
}
