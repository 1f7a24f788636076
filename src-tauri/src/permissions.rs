//! Permission requests coming from the webview engine, and the camera and
//! microphone access request made at startup.

use tauri::WebviewWindow;
use unread_scraper::{PermissionKind, PermissionPolicy};

/// Whether the shell answers the engine's own permission prompts on this
/// platform. Elsewhere the system webview asks the user.
pub const ENGINE_HANDLER: bool = cfg!(target_os = "linux");

/// State the page sees for a permission `name`.
///
/// Media the engine will still prompt for is reported as `prompt` so the
/// page never believes it already holds a grant it does not have.
pub fn page_state(policy: &PermissionPolicy, name: &str, engine_handler: bool) -> &'static str {
    let decision = policy.decide_web(name);
    let media = PermissionKind::from_web_name(name) == PermissionKind::Media;
    if media && decision.is_granted() && !engine_handler {
        return "prompt";
    }
    decision.as_web_state()
}

/// Route the window's engine-level permission requests through `policy`.
#[cfg(target_os = "linux")]
pub fn install(window: &WebviewWindow, policy: PermissionPolicy) {
    let label = window.label().to_string();
    let result = window.with_webview(move |webview| {
        webkit::connect(&webview.inner(), policy, label);
    });
    if let Err(e) = result {
        tracing::warn!(window = window.label(), "Failed to hook permission requests: {e}");
    }
}

#[cfg(not(target_os = "linux"))]
pub fn install(window: &WebviewWindow, _policy: PermissionPolicy) {
    tracing::debug!(
        window = window.label(),
        "Engine permission prompts are left to the system webview"
    );
}

#[cfg(target_os = "linux")]
mod webkit {
    use glib::prelude::*;
    use unread_scraper::{PermissionKind, PermissionPolicy};
    use webkit2gtk::{
        DeviceInfoPermissionRequest, GeolocationPermissionRequest, NotificationPermissionRequest,
        PermissionRequest, PermissionRequestExt, UserMediaPermissionRequest, WebView, WebViewExt,
    };

    pub fn connect(webview: &WebView, policy: PermissionPolicy, label: String) {
        webview.connect_permission_request(move |_, request| {
            let kind = classify(request);
            let decision = policy.decide(&kind);
            tracing::info!(window = %label, ?kind, ?decision, "Engine permission request");
            if decision.is_granted() {
                request.allow();
            } else {
                request.deny();
            }
            true
        });
    }

    fn classify(request: &PermissionRequest) -> PermissionKind {
        if request.is::<UserMediaPermissionRequest>() || request.is::<DeviceInfoPermissionRequest>()
        {
            PermissionKind::Media
        } else if request.is::<NotificationPermissionRequest>() {
            PermissionKind::Notifications
        } else if request.is::<GeolocationPermissionRequest>() {
            PermissionKind::Geolocation
        } else {
            PermissionKind::Other(request.type_().name().to_ascii_lowercase())
        }
    }
}

/// Ask the OS for microphone and camera access so calls work without a
/// mid-call prompt. The outcome is only logged.
#[cfg(target_os = "macos")]
pub fn request_media_access(policy: &PermissionPolicy) {
    use block2::RcBlock;
    use objc2::runtime::Bool;
    use objc2_av_foundation::AVCaptureDevice;
    use objc2_foundation::NSString;

    if !policy.decide(&PermissionKind::Media).is_granted() {
        return;
    }
    // AVMediaTypeAudio and AVMediaTypeVideo.
    for (media, media_type) in [("microphone", "soun"), ("camera", "vide")] {
        let handler = RcBlock::new(move |granted: Bool| {
            tracing::info!(media, granted = granted.as_bool(), "Media access");
        });
        let media_type = NSString::from_str(media_type);
        unsafe {
            AVCaptureDevice::requestAccessForMediaType_completionHandler(&media_type, &handler);
        }
    }
}

#[cfg(not(target_os = "macos"))]
pub fn request_media_access(policy: &PermissionPolicy) {
    let decision = policy.decide(&PermissionKind::Media);
    if ENGINE_HANDLER {
        tracing::info!(?decision, "Camera and microphone requests are answered by the shell");
    } else {
        tracing::info!(?decision, "Camera and microphone are prompted by the system webview");
    }
}
