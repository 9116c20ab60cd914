use crate::state::State;

pub enum LocalCommandResult {
    Handled {
        msg: String,
    },

    /// A command to exit the app was detected
    Exit,

    /// The command was not processed locally (and should be sent to the actor).
    Unhandled,
}

pub fn handle_local_command(state: &mut State, input: &str) -> LocalCommandResult {
    match input.trim() {
        "/progress" => {
            state.show_progress = !state.show_progress;
            LocalCommandResult::Handled {
                msg: format!(
                    "Progress updates: {}",
                    if state.show_progress {
                        "enabled"
                    } else {
                        "disabled"
                    }
                ),
            }
        }
        "/exit" | "/quit" => LocalCommandResult::Exit,
        _ => LocalCommandResult::Unhandled,
    }
}
