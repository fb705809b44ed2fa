//! Route string decomposition.
//!
//! Routes on the site read `"<origin> to <destination>[ via <stop>]"`.
//! Anything that does not contain `" to "` (including the `"Unknown"`
//! placeholder) only yields an origin.

use crate::models::Stops;

const TO: &str = " to ";
const VIA: &str = " via ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParts {
    pub from: String,
    pub to: Option<String>,
    pub via: Option<String>,
    pub stops: Stops,
}

/// Split a trimmed route string into origin, destination and via-stop.
pub fn split_route(route: &str) -> RouteParts {
    let (from, rest) = match route.split_once(TO) {
        Some((from, rest)) => (from, Some(rest)),
        None => (route, None),
    };

    let (to, via) = match rest {
        Some(rest) => match rest.split_once(VIA) {
            Some((to, via)) => (Some(to.to_string()), Some(via.to_string())),
            None => (Some(rest.to_string()), None),
        },
        None => (None, None),
    };

    let stops = if via.is_some() {
        Stops::OneStop
    } else {
        Stops::Direct
    };

    RouteParts {
        from: from.to_string(),
        to,
        via,
        stops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_with_via() {
        let parts = split_route("London to New York via Boston");
        assert_eq!(parts.from, "London");
        assert_eq!(parts.to.as_deref(), Some("New York"));
        assert_eq!(parts.via.as_deref(), Some("Boston"));
        assert_eq!(parts.stops, Stops::OneStop);
    }

    #[test]
    fn test_direct_route() {
        let parts = split_route("Heathrow to Dubai");
        assert_eq!(parts.from, "Heathrow");
        assert_eq!(parts.to.as_deref(), Some("Dubai"));
        assert_eq!(parts.via, None);
        assert_eq!(parts.stops, Stops::Direct);
    }

    #[test]
    fn test_route_without_separator() {
        let parts = split_route("Unknown");
        assert_eq!(parts.from, "Unknown");
        assert_eq!(parts.to, None);
        assert_eq!(parts.via, None);
        assert_eq!(parts.stops, Stops::Direct);

        // A via-stop is only looked for after " to ".
        let parts = split_route("LHR via DOH");
        assert_eq!(parts.from, "LHR via DOH");
        assert_eq!(parts.via, None);
    }

    #[test]
    fn test_only_first_separator_splits() {
        let parts = split_route("Glasgow to London to Toronto via Reykjavik via Halifax");
        assert_eq!(parts.from, "Glasgow");
        assert_eq!(parts.to.as_deref(), Some("London to Toronto"));
        assert_eq!(parts.via.as_deref(), Some("Reykjavik via Halifax"));
    }

    #[test]
    fn test_separator_needs_surrounding_spaces() {
        let parts = split_route("Toronto to Tokyo");
        assert_eq!(parts.from, "Toronto");
        assert_eq!(parts.to.as_deref(), Some("Tokyo"));
    }
}
