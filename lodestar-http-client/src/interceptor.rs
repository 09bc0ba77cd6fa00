//! Request interceptors.

use http::HeaderMap;
use tracing::warn;

/// Hook applied to every outgoing request before it is sent.
pub trait RequestInterceptor: Send + Sync {
    /// Mutate the request headers before sending.
    fn before_send(&self, headers: &mut HeaderMap);
}

/// Interceptor that adds headers produced by a supplier callback to every
/// request.
///
/// The supplier runs once per request, so dynamic values (correlation IDs,
/// short-lived tokens) are re-evaluated each time. `HeaderMap` carries
/// multiple values per name, so multivalued headers work through
/// [`HeaderMap::append`].
pub struct HeaderSupplier {
    supplier: Box<dyn Fn() -> Option<HeaderMap> + Send + Sync>,
}

impl HeaderSupplier {
    pub fn new<F>(supplier: F) -> Self
    where
        F: Fn() -> Option<HeaderMap> + Send + Sync + 'static,
    {
        Self {
            supplier: Box::new(supplier),
        }
    }

    /// Build a supplier from a callback producing name/value string pairs.
    /// Pairs that are not valid header names or values are skipped.
    pub fn from_pairs<F>(supplier: F) -> Self
    where
        F: Fn() -> Vec<(String, String)> + Send + Sync + 'static,
    {
        Self::new(move || {
            let mut headers = HeaderMap::new();
            for (name, value) in supplier() {
                if let (Ok(name), Ok(value)) = (
                    http::HeaderName::try_from(name.as_str()),
                    http::HeaderValue::try_from(value.as_str()),
                ) {
                    headers.append(name, value);
                }
            }
            Some(headers)
        })
    }
}

impl RequestInterceptor for HeaderSupplier {
    fn before_send(&self, headers: &mut HeaderMap) {
        match (self.supplier)() {
            Some(supplied) if !supplied.is_empty() => {
                for (name, value) in supplied.iter() {
                    headers.append(name, value.clone());
                }
            }
            _ => warn!("No headers to add: supplier provided no headers"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn adds_supplied_headers() {
        let interceptor = HeaderSupplier::from_pairs(|| {
            vec![("X-Correlation-Id".to_string(), "abc-123".to_string())]
        });

        let mut headers = HeaderMap::new();
        interceptor.before_send(&mut headers);

        assert_eq!(
            headers.get("X-Correlation-Id"),
            Some(&HeaderValue::from_static("abc-123"))
        );
    }

    #[test]
    fn appends_rather_than_replaces() {
        let interceptor =
            HeaderSupplier::from_pairs(|| vec![("X-Tag".to_string(), "supplied".to_string())]);

        let mut headers = HeaderMap::new();
        headers.insert("X-Tag", HeaderValue::from_static("existing"));
        interceptor.before_send(&mut headers);

        let values: Vec<_> = headers.get_all("X-Tag").iter().collect();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn supports_multiple_values_for_the_same_name() {
        let interceptor = HeaderSupplier::from_pairs(|| {
            vec![
                ("X-Role".to_string(), "reader".to_string()),
                ("X-Role".to_string(), "writer".to_string()),
            ]
        });

        let mut headers = HeaderMap::new();
        interceptor.before_send(&mut headers);

        assert_eq!(headers.get_all("X-Role").iter().count(), 2);
    }

    #[test]
    fn empty_supplier_leaves_headers_untouched() {
        let interceptor = HeaderSupplier::new(|| None);

        let mut headers = HeaderMap::new();
        headers.insert("X-Existing", HeaderValue::from_static("1"));
        interceptor.before_send(&mut headers);

        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn invalid_pairs_are_skipped() {
        let interceptor = HeaderSupplier::from_pairs(|| {
            vec![
                ("bad header name".to_string(), "x".to_string()),
                ("X-Good".to_string(), "y".to_string()),
            ]
        });

        let mut headers = HeaderMap::new();
        interceptor.before_send(&mut headers);

        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key("X-Good"));
    }
}
