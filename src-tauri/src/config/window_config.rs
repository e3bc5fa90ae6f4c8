use tauri::{LogicalPosition, LogicalSize, Position, Size, WebviewWindow};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Centers a window covering `scale` of a screen given in logical pixels.
pub fn centered_bounds(screen_width: f64, screen_height: f64, scale: f64) -> WindowBounds {
    let width = screen_width * scale;
    let height = screen_height * scale;

    WindowBounds {
        x: (screen_width - width) / 2.0,
        y: (screen_height - height) / 2.0,
        width,
        height,
    }
}

pub fn configure_window_size(window: &WebviewWindow, scale: f64) -> Result<(), Box<dyn std::error::Error>> {
    let Ok(Some(monitor)) = window.current_monitor() else {
        tracing::warn!("no monitor information, keeping configured window size");
        return Ok(());
    };

    let size = monitor.size();
    let scale_factor = monitor.scale_factor();
    let bounds = centered_bounds(
        size.width as f64 / scale_factor,
        size.height as f64 / scale_factor,
        scale,
    );

    window.set_size(Size::Logical(LogicalSize::new(bounds.width, bounds.height)))?;
    window.set_position(Position::Logical(LogicalPosition::new(bounds.x, bounds.y)))?;

    Ok(())
}
