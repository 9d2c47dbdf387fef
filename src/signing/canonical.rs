//! Canonical query string building for the SES Query API.
//!
//! The canonical query string is both the form-encoded request body and the
//! payload that gets hashed into the signature, so it must be produced the
//! same way every time for the same parameters.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::types::RequestParameters;

/// Characters that should NOT be percent-encoded in query strings.
///
/// According to RFC 3986, these characters are "unreserved":
/// - Alphanumeric: A-Z, a-z, 0-9
/// - Special: - (hyphen), _ (underscore), . (period), ~ (tilde)
///
/// Everything else, including `/`, `+`, `=` and space, is encoded.
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a parameter name or value.
///
/// All bytes except A-Z, a-z, 0-9, '-', '_', '.' and '~' are encoded as
/// `%XX` with uppercase hex digits. Non-ASCII input is encoded as its UTF-8
/// bytes.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_simple::signing::uri_encode;
///
/// assert_eq!(uri_encode("hello world"), "hello%20world");
/// assert_eq!(uri_encode("a+b=c/d"), "a%2Bb%3Dc%2Fd");
/// assert_eq!(uri_encode("Destination.ToAddresses.member.1"), "Destination.ToAddresses.member.1");
/// ```
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, QUERY_SET).to_string()
}

/// Build the canonical query string for a parameter set.
///
/// The canonical query string is built by:
/// 1. Taking parameters in ascending byte-wise order of their raw names
/// 2. URI-encoding each name and value
/// 3. Joining `name=value` pairs with `&`
///
/// An empty parameter set yields an empty string.
///
/// # Examples
///
/// ```
/// use integrations_aws_ses_simple::signing::canonical_query_string;
/// use integrations_aws_ses_simple::types::RequestParameters;
///
/// let params: RequestParameters = [
///     ("Source", "me@example.com"),
///     ("Action", "VerifyEmailAddress"),
/// ].into_iter().collect();
///
/// assert_eq!(
///     canonical_query_string(&params),
///     "Action=VerifyEmailAddress&Source=me%40example.com"
/// );
/// ```
pub fn canonical_query_string(params: &RequestParameters) -> String {
    let mut query = String::new();
    for (name, value) in params.iter() {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&uri_encode(name));
        query.push('=');
        query.push_str(&uri_encode(value));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;
    use proptest::prelude::*;

    fn decode_query(query: &str) -> RequestParameters {
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap();
                (
                    percent_decode_str(name).decode_utf8().unwrap().into_owned(),
                    percent_decode_str(value).decode_utf8().unwrap().into_owned(),
                )
            })
            .collect()
    }

    #[test]
    fn test_reserved_characters_survive_reserialization() {
        let params: RequestParameters = [("b c", "x y+z"), ("A", "é&=")].into_iter().collect();
        let query = canonical_query_string(&params);
        assert_eq!(query, "A=%C3%A9%26%3D&b%20c=x%20y%2Bz");

        let reparsed = decode_query(&query);
        assert_eq!(reparsed.get("b c"), Some("x y+z"));
        assert_eq!(reparsed.get("A"), Some("é&="));
        assert_eq!(canonical_query_string(&reparsed), query);
    }

    #[test]
    fn test_uri_encode_unreserved() {
        assert_eq!(uri_encode("AZaz09-_.~"), "AZaz09-_.~");
    }

    #[test]
    fn test_uri_encode_reserved() {
        assert_eq!(uri_encode("a b"), "a%20b");
        assert_eq!(uri_encode("a+b"), "a%2Bb");
        assert_eq!(uri_encode("user@example.com"), "user%40example.com");
        assert_eq!(uri_encode("x/y?z&w=v"), "x%2Fy%3Fz%26w%3Dv");
    }

    #[test]
    fn test_uri_encode_utf8() {
        assert_eq!(uri_encode("é"), "%C3%A9");
        assert_eq!(uri_encode("日"), "%E6%97%A5");
    }

    #[test]
    fn test_canonical_query_string_empty() {
        assert_eq!(canonical_query_string(&RequestParameters::new()), "");
    }

    #[test]
    fn test_canonical_query_string_single() {
        let params = RequestParameters::for_action("GetSendQuota");
        assert_eq!(canonical_query_string(&params), "Action=GetSendQuota");
    }

    #[test]
    fn test_canonical_query_string_multiple_sorted() {
        let params: RequestParameters = [
            ("Message.Subject.Data", "Hello there"),
            ("Action", "SendEmail"),
            ("Destination.ToAddresses.member.1", "a@example.com"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            canonical_query_string(&params),
            "Action=SendEmail\
             &Destination.ToAddresses.member.1=a%40example.com\
             &Message.Subject.Data=Hello%20there"
        );
    }

    #[test]
    fn test_canonical_query_string_empty_value() {
        let params: RequestParameters = [("Empty", "")].into_iter().collect();
        assert_eq!(canonical_query_string(&params), "Empty=");
    }

    proptest! {
        #[test]
        fn prop_insertion_order_independent(
            entries in proptest::collection::btree_map("[A-Za-z0-9.]{1,12}", ".{0,16}", 0..8)
        ) {
            let forward: RequestParameters = entries.clone().into_iter().collect();
            let reverse: RequestParameters = entries.into_iter().rev().collect();

            prop_assert_eq!(
                canonical_query_string(&forward),
                canonical_query_string(&reverse)
            );
        }

        #[test]
        fn prop_serialization_is_idempotent(
            entries in proptest::collection::btree_map(".{1,12}", ".{0,16}", 0..8)
        ) {
            let params: RequestParameters = entries.into_iter().collect();
            let query = canonical_query_string(&params);

            let reparsed = decode_query(&query);
            prop_assert_eq!(reparsed.len(), params.len());
            prop_assert_eq!(canonical_query_string(&reparsed), query);
        }

        #[test]
        fn prop_output_is_ascii_and_unambiguous(
            name in "[A-Za-z.]{1,8}",
            value in ".{0,16}"
        ) {
            let params: RequestParameters = [(name, value)].into_iter().collect();
            let query = canonical_query_string(&params);

            prop_assert!(query.is_ascii());
            prop_assert_eq!(query.matches('=').count(), 1);
            prop_assert!(!query.contains('&'));
            prop_assert!(!query.contains(' '));
        }
    }
}
