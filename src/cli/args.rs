use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "namaz", version, author, about = "Track the five daily prayers, streaks and qaza from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's prayers and quick stats
    Today,
    /// Flip a prayer between done and not done
    Toggle {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
        /// Date as YYYY-MM-DD, "today" or "yesterday"
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// Mark a prayer as done (or not done with --undo)
    Mark {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
        /// Date as YYYY-MM-DD, "today" or "yesterday"
        #[arg(long, default_value = "today")]
        date: String,
        /// Mark as not done
        #[arg(long)]
        undo: bool,
    },
    /// Show the week containing a date
    Week {
        #[arg(long, default_value = "today")]
        date: String,
        /// Weeks to move from that date (negative goes back)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i64,
    },
    /// Show the month calendar containing a date
    Month {
        #[arg(long, default_value = "today")]
        date: String,
        /// Months to move from that date (negative goes back)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
    },
    /// Show streak, weekly/monthly completion and qaza
    Stats,
    /// Export a weekly summary to stdout
    Export {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
