use crate::cli::actions::{server, Action};
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server(server::Args {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
        identity_header: matches
            .get_one("identity-header")
            .map_or_else(|| "x-authenticated-user".to_string(), |s: &String| s.to_string()),
        admins: collect_list(matches, "admins"),
        support_users: collect_list(matches, "support-users"),
        group_service_url: matches
            .get_one("group-service-url")
            .map(|s: &String| s.to_string()),
        group_service_token: matches
            .get_one("group-service-token")
            .map(|s: &String| s.to_string()),
        session_ttl: matches
            .get_one::<i64>("session-ttl")
            .copied()
            .unwrap_or(21600),
    }))
}

fn collect_list(matches: &clap::ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| {
            values
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn handler_builds_server_action() -> Result<()> {
        let matches = commands::new().get_matches_from(vec![
            "sesamo",
            "--dsn",
            "postgres://localhost/sesamo",
            "--admins",
            "alice@example.com, ,ops@example.com",
            "--session-ttl",
            "600",
        ]);

        let Action::Server(args) = handler(&matches)?;
        assert_eq!(args.port, 8080);
        assert_eq!(args.dsn, "postgres://localhost/sesamo");
        assert_eq!(args.identity_header, "x-authenticated-user");
        assert_eq!(args.admins, vec!["alice@example.com", "ops@example.com"]);
        assert!(args.support_users.is_empty());
        assert_eq!(args.group_service_url, None);
        assert_eq!(args.session_ttl, 600);
        Ok(())
    }
}
