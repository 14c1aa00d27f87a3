use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub group_service_url: Option<String>,
    pub group_service_token: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(group_service_url: Option<String>) -> Self {
        Self {
            group_service_url,
            group_service_token: SecretString::default(),
        }
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.group_service_token = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let url = Some("https://groups.tld".to_string());
        let args = GlobalArgs::new(url);
        assert_eq!(args.group_service_url.as_deref(), Some("https://groups.tld"));
        assert_eq!(args.group_service_token.expose_secret(), "");
    }

    #[test]
    fn test_global_args_set_token() {
        let mut args = GlobalArgs::new(None);
        args.set_token(SecretString::from("secret".to_string()));
        assert_eq!(args.group_service_token.expose_secret(), "secret");
    }
}
