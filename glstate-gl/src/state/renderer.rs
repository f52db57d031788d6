use crate::context::ExtensionSupport;
use crate::extensions;
use crate::renderer::ResetNotificationStrategy;

/// `glClearDepthf` or `glClearDepth`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ClearDepth {
    Default,
    Es,
}

/// How the graphics reset status is queried.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ResetStatus {
    /// Always reports no reset.
    Default,
    Robustness,
}

#[derive(Debug)]
pub(crate) struct RendererState {
    pub clear_depth: ClearDepth,
    pub reset_status: ResetStatus,
    pub reset_notification_strategy: Option<ResetNotificationStrategy>,
}

impl RendererState {
    pub fn new(ext: &ExtensionSupport, used: &mut Vec<&'static str>) -> Self {
        let clear_depth = if ext.is_supported(&extensions::ARB_ES2_COMPATIBILITY) {
            used.push(extensions::ARB_ES2_COMPATIBILITY.name());
            ClearDepth::Es
        } else {
            ClearDepth::Default
        };

        let reset_status = if ext.is_supported(&extensions::ARB_ROBUSTNESS) {
            if !used.contains(&extensions::ARB_ROBUSTNESS.name()) {
                used.push(extensions::ARB_ROBUSTNESS.name());
            }
            ResetStatus::Robustness
        } else {
            ResetStatus::Default
        };

        RendererState {
            clear_depth,
            reset_status,
            reset_notification_strategy: None,
        }
    }
}
