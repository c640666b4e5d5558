use crate::{
    CameraDevice, FacingMode, ReplayCamera, Resolution, ScanError, StreamRequest,
    TrackConstraints, tests::support::scratch_dir,
};

use image::{GrayImage, Luma};

fn request(facing_mode: FacingMode) -> StreamRequest {
    StreamRequest {
        facing_mode,
        resolution: Resolution::default(),
    }
}

/// WHAT: Missing frame directory is reported as a camera access failure
/// WHY: Behaves like a device that does not exist
#[test]
fn given_missing_directory_when_opening_then_camera_access_error() {
    // Given: A replay camera pointing nowhere
    let mut camera = ReplayCamera::new("/nonexistent/frames");

    // When: Opening a stream
    let result = camera.open(request(FacingMode::Environment));

    // Then: CameraAccess
    assert!(matches!(result, Err(ScanError::CameraAccess { .. })));
}

/// WHAT: A directory without images cannot produce a stream
/// WHY: No frames means no matching device
#[test]
#[allow(clippy::unwrap_used)]
fn given_directory_without_images_when_opening_then_camera_access_error() {
    // Given: An empty directory with an unrelated file
    let dir = scratch_dir("replay-empty");
    std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();
    let mut camera = ReplayCamera::new(&dir);

    // When: Opening a stream
    let result = camera.open(request(FacingMode::Environment));

    // Then: CameraAccess
    assert!(matches!(result, Err(ScanError::CameraAccess { .. })));
    let _ = std::fs::remove_dir_all(dir);
}

/// WHAT: Frames are replayed with their real dimensions and cycle
/// WHY: The decode loop samples whatever the stream returns
#[test]
#[allow(clippy::unwrap_used)]
fn given_two_images_when_grabbing_frames_then_images_cycle() {
    // Given: Two images of different sizes
    let dir = scratch_dir("replay-cycle");
    GrayImage::from_pixel(8, 6, Luma([10]))
        .save(dir.join("a.png"))
        .unwrap();
    GrayImage::from_pixel(4, 4, Luma([20]))
        .save(dir.join("b.png"))
        .unwrap();
    let mut camera = ReplayCamera::new(&dir);

    // When: Opening and grabbing three frames
    let mut stream = camera.open(request(FacingMode::Environment)).unwrap();
    let sizes: Vec<(u32, u32)> = (0..3)
        .map(|_| {
            let frame = stream.grab_frame().unwrap();
            (frame.width(), frame.height())
        })
        .collect();

    // Then: Settings report the first frame and grabs wrap around
    assert_eq!(stream.settings().width, 8);
    assert_eq!(sizes, vec![(8, 6), (4, 4), (8, 6)]);
    let _ = std::fs::remove_dir_all(dir);
}

/// WHAT: A facing-mode subdirectory is preferred when present
/// WHY: Lets a replay setup emulate front and back cameras
#[test]
#[allow(clippy::unwrap_used)]
fn given_user_subdirectory_when_opening_user_camera_then_its_frames_used() {
    // Given: Root frames and a separate user/ frame
    let dir = scratch_dir("replay-modes");
    GrayImage::from_pixel(8, 8, Luma([0]))
        .save(dir.join("root.png"))
        .unwrap();
    std::fs::create_dir_all(dir.join("user")).unwrap();
    GrayImage::from_pixel(3, 2, Luma([0]))
        .save(dir.join("user").join("selfie.png"))
        .unwrap();
    let mut camera = ReplayCamera::new(&dir);

    // When: Opening both facing modes
    let user = camera.open(request(FacingMode::User)).unwrap();
    let environment = camera.open(request(FacingMode::Environment)).unwrap();

    // Then: Each saw its own frames
    assert_eq!((user.settings().width, user.settings().height), (3, 2));
    assert_eq!(environment.settings().width, 8);
    let _ = std::fs::remove_dir_all(dir);
}

/// WHAT: Replayed tracks have no torch and reject torch constraints
/// WHY: Flash toggling must report unsupported for file-backed streams
#[test]
#[allow(clippy::unwrap_used)]
fn given_replay_stream_when_checking_torch_then_unsupported() {
    // Given: An opened replay stream
    let dir = scratch_dir("replay-torch");
    GrayImage::from_pixel(2, 2, Luma([0]))
        .save(dir.join("frame.png"))
        .unwrap();
    let mut camera = ReplayCamera::new(&dir);
    let mut stream = camera.open(request(FacingMode::Environment)).unwrap();

    // When: Inspecting capability and forcing a torch constraint
    let capable = stream.capabilities().torch;
    let applied = stream.apply_constraints(TrackConstraints { torch: Some(true) });

    // Then: Torch is unsupported
    assert!(!capable);
    assert!(matches!(applied, Err(ScanError::FlashUnsupported { .. })));

    // And: A stopped track stops producing frames
    stream.stop_tracks();
    assert!(stream.grab_frame().is_err());
    let _ = std::fs::remove_dir_all(dir);
}
