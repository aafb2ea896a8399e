use crate::models::cancel::{CancelEvent, CancelToken};
use crate::models::capture::{AfMode, AfStatus, AfTrigger, Control, ControlList, DeviceEvent};
use crate::models::error::LapseError;
use crate::traits::capture_device::CaptureDevice;

/// Terminal result of the one-shot autofocus scan run before scheduling
/// begins. The intermediate idle/scanning statuses stay internal to the
/// polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutofocusOutcome {
    /// The scan settled: focused, failed, or status unreported.
    Complete,
    /// Operator abort or device shutdown ended the scan early.
    Cancelled,
}

/// Trigger an autofocus scan and poll the device until it settles.
///
/// The caller must have configured a viewfinder stream and started the
/// device. Device timeouts are retried indefinitely (stop+start restart),
/// bounded only by the operator cancelling. The device is left stopped
/// only on the `Cancelled` path taken after an abort.
pub fn run_autofocus_prelude<D: CaptureDevice>(
    device: &mut D,
    cancel: &CancelToken,
) -> Result<AutofocusOutcome, LapseError> {
    let mut controls = ControlList::new();
    controls.set(Control::AfMode(AfMode::Auto));
    controls.set(Control::AfTrigger(AfTrigger::Start));
    device.set_controls(controls)?;

    log::info!("running autofocus before capturing timelapse");

    loop {
        match device.wait()? {
            DeviceEvent::Timeout => {
                log::error!("device timeout detected, attempting a restart");
                if cancel.take() == CancelEvent::AbortRequested {
                    return Ok(AutofocusOutcome::Cancelled);
                }
                device.stop()?;
                device.start()?;
            }
            DeviceEvent::Quit => return Ok(AutofocusOutcome::Cancelled),
            DeviceEvent::CaptureComplete(capture) => {
                if cancel.take() == CancelEvent::AbortRequested {
                    device.stop()?;
                    return Ok(AutofocusOutcome::Cancelled);
                }

                match capture.metadata.af_status {
                    Some(AfStatus::Idle) => {
                        log::debug!("AF scan status: idle");
                    }
                    Some(AfStatus::Scanning) => {
                        log::debug!(
                            "AF scan status: scanning, lens position = {:?}",
                            capture.metadata.lens_position
                        );
                    }
                    // Focused, Failed, or unreported all end the scan.
                    _ => {
                        log::info!(
                            "autofocus completed, lens position = {:?}",
                            capture.metadata.lens_position
                        );
                        return Ok(AutofocusOutcome::Complete);
                    }
                }
            }
        }
    }
}

/// Controls that pin the lens after a completed scan, applied before the
/// capture schedule starts.
pub fn af_lock_controls() -> ControlList {
    let mut controls = ControlList::new();
    controls.set(Control::AfMode(AfMode::Auto));
    controls.set(Control::AfTrigger(AfTrigger::Cancel));
    controls
}
