//! Command-line configuration of the server binary.

use clap::{Parser, ValueEnum};

use crate::{
    domain::{
        AttendanceThreshold, ClaimPolicy, ValueObjectError,
        value_object::DEFAULT_ATTENDANCE_THRESHOLD,
    },
    infrastructure::identity::IdentitySeed,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "focusroom-server")]
#[command(about = "Focus room server with shared timers and attendance rewards", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    pub port: u16,

    /// Share of the session a participant must attend to claim, in (0, 1]
    #[arg(long, default_value_t = DEFAULT_ATTENDANCE_THRESHOLD)]
    pub attendance_threshold: f64,

    /// How often a user may claim within one session
    #[arg(long, value_enum, default_value_t = ClaimPolicyArg::Repeatable)]
    pub claim_policy: ClaimPolicyArg,

    /// Seconds an empty room is kept before it is discarded (0 keeps rooms forever)
    #[arg(long, default_value = "1800")]
    pub room_idle_ttl_secs: u64,

    /// Seconds between two expiry sweeps
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    pub reap_interval_secs: u64,

    /// Offset from UTC used for the HH:MM stamp of chat messages
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub utc_offset_minutes: i32,

    /// Accepted token, as TOKEN:USERNAME:USER_ID (repeatable)
    #[arg(long = "identity", value_name = "TOKEN:USERNAME:USER_ID")]
    pub identities: Vec<IdentitySeed>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClaimPolicyArg {
    /// Every eligible claim counts
    Repeatable,
    /// One claim per user per session
    OncePerSession,
}

impl From<ClaimPolicyArg> for ClaimPolicy {
    fn from(arg: ClaimPolicyArg) -> Self {
        match arg {
            ClaimPolicyArg::Repeatable => ClaimPolicy::Repeatable,
            ClaimPolicyArg::OncePerSession => ClaimPolicy::OncePerSession,
        }
    }
}

impl ServerConfig {
    pub fn threshold(&self) -> Result<AttendanceThreshold, ValueObjectError> {
        AttendanceThreshold::new(self.attendance_threshold)
    }

    pub fn room_idle_ttl_secs(&self) -> i64 {
        i64::try_from(self.room_idle_ttl_secs).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしで既定値が使われる
        // given (前提条件):
        let args = ["focusroom-server"];

        // when (操作):
        let config = ServerConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.threshold().unwrap().value(), 0.9);
        assert_eq!(ClaimPolicy::from(config.claim_policy), ClaimPolicy::Repeatable);
        assert_eq!(config.room_idle_ttl_secs(), 1800);
        assert_eq!(config.utc_offset_minutes, 0);
        assert!(config.identities.is_empty());
    }

    #[test]
    fn test_parse_all_flags() {
        // テスト項目: 全てのフラグを解析できる
        // given (前提条件):
        let args = [
            "focusroom-server",
            "--port",
            "3000",
            "--attendance-threshold",
            "0.75",
            "--claim-policy",
            "once-per-session",
            "--room-idle-ttl-secs",
            "0",
            "--utc-offset-minutes",
            "-300",
            "--identity",
            "a-token:alice:1",
            "--identity",
            "b-token:bob:2",
        ];

        // when (操作):
        let config = ServerConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.port, 3000);
        assert_eq!(config.threshold().unwrap().value(), 0.75);
        assert_eq!(
            ClaimPolicy::from(config.claim_policy),
            ClaimPolicy::OncePerSession
        );
        assert_eq!(config.room_idle_ttl_secs(), 0);
        assert_eq!(config.utc_offset_minutes, -300);
        assert_eq!(config.identities.len(), 2);
        assert_eq!(config.identities[1].identity.username.as_str(), "bob");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        // テスト項目: 不正な値は解析時または検証時にエラーになる
        assert!(ServerConfig::try_parse_from(["focusroom-server", "--identity", "broken"]).is_err());
        assert!(
            ServerConfig::try_parse_from(["focusroom-server", "--reap-interval-secs", "0"])
                .is_err()
        );
        let config =
            ServerConfig::try_parse_from(["focusroom-server", "--attendance-threshold", "1.5"])
                .unwrap();
        assert!(config.threshold().is_err());
    }
}
