use crate::GrayFrame;

/// WHAT: Getters report the buffer shape and out-of-range reads are white
/// WHY: The decoder samples edges and must not index past the buffer
#[test]
#[allow(clippy::unwrap_used)]
fn given_small_frame_when_reading_then_shape_and_white_border() {
    // Given: A 2x2 frame with one dark pixel
    let frame = GrayFrame::new(2, 2, vec![0, 255, 255, 255]).unwrap();

    // When/Then: Shape matches, inside reads the pixel, outside reads white
    assert_eq!((frame.width(), frame.height()), (2, 2));
    assert!(!frame.is_empty());
    assert_eq!(frame.luma(0, 0), 0);
    assert_eq!(frame.luma(2, 0), u8::MAX);
    assert_eq!(frame.luma(0, 5), u8::MAX);
}

/// WHAT: A zero-sized frame is empty
/// WHY: Empty grabs are skipped instead of decoded
#[test]
#[allow(clippy::unwrap_used)]
fn given_zero_sized_frame_when_checking_then_empty() {
    let frame = GrayFrame::new(0, 0, Vec::new()).unwrap();

    assert!(frame.is_empty());
}
