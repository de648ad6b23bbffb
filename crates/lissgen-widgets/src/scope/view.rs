//! Scope view function

use iced::widget::Canvas;
use iced::{Element, Length};
use lissgen_core::render::TraceFrame;

use super::canvas::ScopeCanvas;

/// Scope filling the available space
///
/// ```ignore
/// fn view(&self) -> Element<Message> {
///     row![controls, lissajous_scope(&self.trace_frame)].into()
/// }
/// ```
pub fn lissajous_scope<'a, Message>(frame: &'a TraceFrame) -> Element<'a, Message>
where
    Message: 'a,
{
    Canvas::new(ScopeCanvas { frame })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
