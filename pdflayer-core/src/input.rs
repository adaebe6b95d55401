use crate::Command;

/// Maps a `KeyboardEvent.key` value to a viewer command.
pub fn key_command(key: &str) -> Option<Command> {
    let command = match key {
        "ArrowRight" | "PageDown" | "j" | "l" => Command::NextPage,
        "ArrowLeft" | "PageUp" | "k" | "h" => Command::PrevPage,
        "Home" => Command::FirstPage,
        "End" => Command::LastPage,
        "d" => Command::ToggleDarkMode,
        _ => return None,
    };
    Some(command)
}
