use crate::{
    CaptureController, DEFAULT_POLL_INTERVAL, FacingMode, Resolution, ScanError,
    tests::support::{CameraCalls, FakeCamera},
};

use std::sync::atomic::Ordering;

fn controller(torch_capable: bool) -> (CaptureController, CameraCalls) {
    let (camera, calls) = FakeCamera::new(torch_capable);
    let controller = CaptureController::new(
        Box::new(camera),
        FacingMode::Environment,
        Resolution::default(),
        DEFAULT_POLL_INTERVAL,
    );
    (controller, calls)
}

/// WHAT: Stop releases stream tracks exactly once
/// WHY: A second stop must not touch an already released stream
#[test]
#[allow(clippy::unwrap_used)]
fn given_started_controller_when_stopping_twice_then_tracks_released_once() {
    // Given: A controller with an active stream
    let (mut controller, calls) = controller(false);
    controller.start().unwrap();
    assert!(controller.is_scanning());

    // When: Stopping immediately, then stopping again
    controller.stop();
    controller.stop();

    // Then: Tracks were stopped once and scanning is off
    assert_eq!(CameraCalls::count(&calls.stops), 1);
    assert!(!controller.is_scanning());
    assert!(controller.session_id().is_none());
}

/// WHAT: Toggling the camera twice restores the original facing mode
/// WHY: Front/back switching must be reversible
#[test]
#[allow(clippy::unwrap_used)]
fn given_environment_camera_when_toggling_twice_then_back_to_environment() {
    // Given: A running environment-facing stream
    let (mut controller, calls) = controller(false);
    controller.start().unwrap();

    // When: Toggling twice
    controller.toggle_camera().unwrap();
    assert_eq!(controller.facing_mode(), FacingMode::User);
    controller.toggle_camera().unwrap();

    // Then: Facing mode is back and each toggle reopened the device
    assert_eq!(controller.facing_mode(), FacingMode::Environment);
    let modes: Vec<FacingMode> = calls
        .requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.facing_mode)
        .collect();
    assert_eq!(
        modes,
        vec![
            FacingMode::Environment,
            FacingMode::User,
            FacingMode::Environment
        ]
    );
    assert_eq!(CameraCalls::count(&calls.stops), 2);
    assert!(controller.is_scanning());
}

/// WHAT: A failed restart during toggle leaves scanning inactive
/// WHY: The restart error must reach the caller, not be swallowed
#[test]
#[allow(clippy::unwrap_used)]
fn given_denied_device_when_toggling_camera_then_error_and_not_scanning() {
    // Given: A running stream whose device refuses further opens
    let (mut controller, calls) = controller(false);
    controller.start().unwrap();
    calls.deny.store(true, Ordering::SeqCst);

    // When: Toggling the camera
    let result = controller.toggle_camera();

    // Then: CameraAccess propagates and nothing is scanning
    assert!(matches!(result, Err(ScanError::CameraAccess { .. })));
    assert!(!controller.is_scanning());
    assert_eq!(controller.facing_mode(), FacingMode::User);
    assert_eq!(CameraCalls::count(&calls.stops), 1);
}

/// WHAT: Starting against a refusing device fails with CameraAccess
/// WHY: Permission failures are surfaced, not retried
#[test]
fn given_denied_device_when_starting_then_camera_access_error() {
    // Given: A device that denies access
    let (mut controller, calls) = controller(false);
    calls.deny.store(true, Ordering::SeqCst);

    // When: Starting
    let result = controller.start();

    // Then: Error returned once, scanning never began
    assert!(matches!(result, Err(ScanError::CameraAccess { .. })));
    assert!(!controller.is_scanning());
    assert_eq!(calls.requests.lock().map(|r| r.len()).unwrap_or(0), 1);
}

/// WHAT: Starting twice keeps the single active stream
/// WHY: At most one stream may be active per session
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_stream_when_starting_again_then_same_session_reused() {
    // Given: A started controller
    let (mut controller, calls) = controller(false);
    let first = controller.start().unwrap();

    // When: Starting again
    let second = controller.start().unwrap();

    // Then: No second stream was opened
    assert_eq!(first, second);
    assert_eq!(CameraCalls::count(&calls.opens), 1);
}

/// WHAT: Flash toggle without torch capability never applies constraints
/// WHY: Unsupported devices get a non-fatal error instead of a failed constraint
#[test]
#[allow(clippy::unwrap_used)]
fn given_track_without_torch_when_toggling_flash_then_flash_unsupported() {
    // Given: A running stream lacking torch capability
    let (mut controller, calls) = controller(false);
    controller.start().unwrap();

    // When: Toggling the flash
    let result = controller.toggle_flash();

    // Then: FlashUnsupported and no constraints applied, stream still running
    assert!(matches!(result, Err(ScanError::FlashUnsupported { .. })));
    assert_eq!(CameraCalls::count(&calls.applies), 0);
    assert!(controller.is_scanning());
}

/// WHAT: Flash toggle flips the torch each call
/// WHY: The torch constraint follows the current track setting
#[test]
#[allow(clippy::unwrap_used)]
fn given_torch_capable_track_when_toggling_flash_twice_then_on_then_off() {
    // Given: A running stream with a torch
    let (mut controller, calls) = controller(true);
    controller.start().unwrap();

    // When / Then: First toggle lights it, second turns it off
    assert!(controller.toggle_flash().unwrap());
    assert!(!controller.toggle_flash().unwrap());
    assert_eq!(CameraCalls::count(&calls.applies), 2);
}

/// WHAT: Flash toggle with no stream reports NoActiveStream
/// WHY: There is no track to query before start
#[test]
fn given_stopped_controller_when_toggling_flash_then_no_active_stream() {
    // Given: A controller that never started
    let (mut controller, _calls) = controller(true);

    // When: Toggling the flash
    let result = controller.toggle_flash();

    // Then: NoActiveStream
    assert!(matches!(result, Err(ScanError::NoActiveStream { .. })));
}

/// WHAT: Dropping the controller releases the stream
/// WHY: The camera must not stay on after the scanner goes away
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_stream_when_dropping_controller_then_tracks_released() {
    // Given: A started controller
    let (mut controller, calls) = controller(false);
    controller.start().unwrap();

    // When: Dropping it
    drop(controller);

    // Then: Tracks were stopped
    assert_eq!(CameraCalls::count(&calls.stops), 1);
}
