//! IMAP server resolution from an email address.

use super::MailError;
use crate::config::{ImapServer, MailConfig};

/// Split an address into `(local_part, domain)`, rejecting empty halves
fn split_address(address: &str) -> Result<(&str, &str), MailError> {
    address
        .rsplit_once('@')
        .filter(|(local, domain)| !local.is_empty() && !domain.is_empty())
        .ok_or_else(|| MailError::InvalidAddress(address.to_string()))
}

/// Pick the IMAP endpoint for an address.
///
/// An explicit `mail.servers` entry for the domain wins; otherwise the host
/// comes from `mail.host_template` with `{domain}` substituted.
pub fn resolve_server(config: &MailConfig, address: &str) -> Result<ImapServer, MailError> {
    let (_, domain) = split_address(address)?;
    let domain = domain.to_ascii_lowercase();

    if let Some(server) = config.servers.get(&domain) {
        return Ok(server.clone());
    }

    Ok(ImapServer {
        host: config.host_template.replace("{domain}", &domain),
        port: config.default_port,
        local_part_login: false,
    })
}

/// User name sent in the IMAP LOGIN command
pub fn login_name<'a>(server: &ImapServer, address: &'a str) -> Result<&'a str, MailError> {
    if server.local_part_login {
        split_address(address).map(|(local, _)| local)
    } else {
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CountMode;
    use std::collections::HashMap;

    fn make_config() -> MailConfig {
        let mut servers = HashMap::new();
        servers.insert(
            "naver.com".to_string(),
            ImapServer {
                host: "imap.naver.com".to_string(),
                port: 993,
                local_part_login: true,
            },
        );
        servers.insert(
            "corp.example".to_string(),
            ImapServer {
                host: "mail.corp.example".to_string(),
                port: 1993,
                local_part_login: false,
            },
        );
        MailConfig {
            host_template: "imap.{domain}".to_string(),
            default_port: 993,
            mailbox: "INBOX".to_string(),
            count: CountMode::All,
            timeout_secs: 30,
            servers,
        }
    }

    #[test]
    fn test_resolve_from_template() {
        let server = resolve_server(&make_config(), "someone@gmail.com").unwrap();
        assert_eq!(server.host, "imap.gmail.com");
        assert_eq!(server.port, 993);
        assert!(!server.local_part_login);
    }

    #[test]
    fn test_explicit_entry_wins() {
        let server = resolve_server(&make_config(), "ops@corp.example").unwrap();
        assert_eq!(server.host, "mail.corp.example");
        assert_eq!(server.port, 1993);
    }

    #[test]
    fn test_domain_is_case_insensitive() {
        let server = resolve_server(&make_config(), "User@NAVER.com").unwrap();
        assert_eq!(server.host, "imap.naver.com");

        let server = resolve_server(&make_config(), "a@Gmail.COM").unwrap();
        assert_eq!(server.host, "imap.gmail.com");
    }

    #[test]
    fn test_invalid_addresses() {
        let config = make_config();
        for address in ["", "no-at-sign", "@domain.com", "user@"] {
            let err = resolve_server(&config, address).unwrap_err();
            assert_eq!(err.kind(), "validation", "address {address:?}");
        }
    }

    #[test]
    fn test_login_name() {
        let config = make_config();

        let naver = resolve_server(&config, "someone@naver.com").unwrap();
        assert_eq!(login_name(&naver, "someone@naver.com").unwrap(), "someone");

        let gmail = resolve_server(&config, "someone@gmail.com").unwrap();
        assert_eq!(
            login_name(&gmail, "someone@gmail.com").unwrap(),
            "someone@gmail.com"
        );
    }
}
