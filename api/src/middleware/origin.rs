//! Client origin extraction
//!
//! The origin is the key the guard counts failures against. It is the socket
//! peer address unless the server sits behind a trusted reverse proxy, in which
//! case the first address of `X-Forwarded-For` (or, failing that, the first
//! `for=` of `Forwarded`) is used.

use actix_web::{http::header, HttpRequest};
use std::net::IpAddr;

/// Origin used when no address can be determined
pub const UNKNOWN_ORIGIN: &str = "unknown";

/// Resolve the origin of a request
pub fn client_origin(req: &HttpRequest, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_for(req).or_else(|| forwarded(req)) {
            return canonical(ip).to_string();
        }
    }

    req.peer_addr()
        .map(|addr| canonical(addr.ip()).to_string())
        .unwrap_or_else(|| UNKNOWN_ORIGIN.to_string())
}

fn forwarded_for(req: &HttpRequest) -> Option<IpAddr> {
    let value = req.headers().get("x-forwarded-for")?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    parse_node(first)
}

fn forwarded(req: &HttpRequest) -> Option<IpAddr> {
    let value = req.headers().get(header::FORWARDED)?.to_str().ok()?;
    let first = value.split(',').next()?;
    first.split(';').find_map(|pair| {
        let (key, node) = pair.trim().split_once('=')?;
        if key.trim().eq_ignore_ascii_case("for") {
            parse_node(node.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

/// Parse `1.2.3.4`, `1.2.3.4:5678`, `2001:db8::1` or `[2001:db8::1]:5678`
fn parse_node(node: &str) -> Option<IpAddr> {
    if let Ok(ip) = node.parse() {
        return Some(ip);
    }
    if let Some(rest) = node.strip_prefix('[') {
        return rest.split(']').next()?.parse().ok();
    }
    let (host, port) = node.rsplit_once(':')?;
    port.parse::<u16>().ok()?;
    host.parse().ok()
}

/// IPv4-mapped IPv6 peers count as their IPv4 address
fn canonical(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        v4 => v4,
    }
}
