/// Render whole seconds as M:SS for the round clock.
pub fn format_time(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remaining = seconds % 60;
    format!("{}:{:02}", minutes, remaining)
}
