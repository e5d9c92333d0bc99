use crate::types::UNKNOWN;

/// Well-known port assignments used as the baseline guess.
const COMMON_PORTS: &[(u16, &str)] = &[
    (21, "FTP"),
    (22, "SSH"),
    (23, "Telnet"),
    (25, "SMTP"),
    (53, "DNS"),
    (80, "HTTP"),
    (110, "POP3"),
    (143, "IMAP"),
    (443, "HTTPS"),
    (3306, "MySQL"),
    (5432, "PostgreSQL"),
    (6379, "Redis"),
    (8080, "HTTP-Proxy"),
    (27017, "MongoDB"),
];

const WEB_MARKERS: &[&str] = &["http", "apache", "nginx"];

pub fn service_for_port(port: u16) -> Option<&'static str> {
    COMMON_PORTS
        .iter()
        .find(|(p, _)| *p == port)
        .map(|(_, name)| *name)
}

/// Guess `(service, version)` from the port number and its banner line.
///
/// Starts from the port table, then lets banner content override it. The SSH
/// check runs before the HTTP check, so a banner matching both ends up as HTTP.
pub fn classify(port: u16, banner: &str) -> (String, String) {
    let mut service = service_for_port(port).unwrap_or(UNKNOWN).to_string();
    let mut version = UNKNOWN.to_string();
    let lower = banner.to_lowercase();

    if lower.contains("ssh") {
        service = "SSH".to_string();
        if let Some(v) = ssh_version(banner) {
            version = v.to_string();
        }
    }

    if WEB_MARKERS.iter().any(|m| lower.contains(m)) {
        service = if port == 443 { "HTTPS" } else { "HTTP" }.to_string();
        if let Some((_, rest)) = banner.split_once("Server:") {
            version = rest.trim().to_string();
        }
    }

    (service, version)
}

/// `SSH-2.0-OpenSSH_8.2p1 Ubuntu 4ubuntu0.5` style banners carry the version in
/// the second token; a bare identification string `SSH-2.0-OpenSSH_8.9` carries
/// it after the `SSH-` prefix.
fn ssh_version(banner: &str) -> Option<&str> {
    let parts: Vec<&str> = banner.split(' ').collect();
    if parts.len() > 2 {
        return Some(parts[1]);
    }
    let first = parts[0];
    match first.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("ssh-") && first.len() > 4 => {
            Some(&first[4..])
        }
        _ => None,
    }
}
