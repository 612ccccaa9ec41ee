//! Console commands
//!
//! The registry of movement-related toggle commands exposed to a
//! developer console. The console frontend itself lives with the host
//! application; this module only defines the commands and maps them onto
//! controller toggles.

/// Controller settings a console command can flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleToggle {
    /// Holding jump re-jumps on every ground contact.
    AutoJump,
    /// Populate the per-tick debug snapshot.
    DrawDebug,
}

/// A registered console command.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub toggle: ConsoleToggle,
}

/// All movement console commands. Names are matched case-insensitively.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "playerAutoJump",
        description: "Enable to automatically jump while holding down space. \
                      Results in easier bunnyhopping.",
        toggle: ConsoleToggle::AutoJump,
    },
    CommandSpec {
        name: "playerDrawDebug",
        description: "Renders some debug information relating to the player.",
        toggle: ConsoleToggle::DrawDebug,
    },
];

/// Look up a command by name, ignoring case.
pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_command_case_insensitive() {
        let command = find_command("playerautojump").unwrap();
        assert_eq!(command.toggle, ConsoleToggle::AutoJump);

        let command = find_command("PLAYERDRAWDEBUG").unwrap();
        assert_eq!(command.toggle, ConsoleToggle::DrawDebug);
    }

    #[test]
    fn test_unknown_command() {
        assert!(find_command("noclip").is_none());
    }

    #[test]
    fn test_command_names_unique() {
        for (i, a) in COMMANDS.iter().enumerate() {
            for b in &COMMANDS[i + 1..] {
                assert!(!a.name.eq_ignore_ascii_case(b.name));
            }
        }
    }
}
