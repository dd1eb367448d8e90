use super::escape_xml;

/// Substitute image returned when a card cannot be rendered.
pub fn render(message: &str) -> String {
    format!(
        r##"<svg width="800" height="200" viewBox="0 0 800 200" xmlns="http://www.w3.org/2000/svg">
  <rect width="800" height="200" fill="#0a0a0a"/>
  <text x="400" y="100" text-anchor="middle" font-family="system-ui" font-size="16" fill="#ef4444">Failed to generate stats: {}</text>
</svg>
"##,
        escape_xml(message)
    )
}
