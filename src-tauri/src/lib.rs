mod app;
mod bootstrap;
mod bridge;
mod commands;
mod config;
mod init_script;
mod notification;
mod permissions;
mod shutdown;
mod watch;
mod window;

use tauri::Manager;
use tracing_subscriber::EnvFilter;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (config, dir) = bootstrap::init_foundation().expect("Failed to initialize configuration");
    let icon = bootstrap::prepare_notification_icon(&dir);
    let shared_state = app::SharedState::new(config, icon);
    let setup_state = shared_state.clone();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .manage(shared_state)
        .setup(move |app| {
            bootstrap::setup(app, setup_state)?;
            Ok(())
        })
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Destroyed = event {
                let state = window.state::<app::SharedState>();
                watch::stop_watching(&state, window.label());
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::report_title,
            commands::script_result,
            commands::show_notification,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| match event {
        #[cfg(target_os = "macos")]
        tauri::RunEvent::ExitRequested { code: None, api, .. } => {
            // Closing the last window keeps the app in the dock.
            api.prevent_exit();
        }
        tauri::RunEvent::ExitRequested { .. } | tauri::RunEvent::Exit => {
            shutdown::graceful_shutdown(&app_handle.state::<app::SharedState>());
        }
        #[cfg(target_os = "macos")]
        tauri::RunEvent::Reopen {
            has_visible_windows: false,
            ..
        } => {
            let state = app_handle.state::<app::SharedState>();
            bootstrap::reopen(app_handle, &state);
        }
        _ => {}
    });
}
