use clap::{Parser, Subcommand};

/// LXSTS Server - list management API with flat-file storage
#[derive(Parser)]
#[command(name = "lxsts-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the server (default)
    Serve,

    /// Print an Argon2 hash for LOGIN_PASSWORD_HASH
    HashPassword {
        /// Password to hash (defaults to LOGIN_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::try_parse_from(["lxsts-server"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_hash_password_command() {
        let cli = Cli::try_parse_from(["lxsts-server", "hash-password", "-p", "hunter22"]).unwrap();
        match cli.command {
            Some(Commands::HashPassword { password }) => {
                assert_eq!(password.as_deref(), Some("hunter22"))
            }
            _ => panic!("expected hash-password"),
        }
    }
}
