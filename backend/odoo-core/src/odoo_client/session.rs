use common::RedactedSecret;

/// Identity and secret proving an authenticated connection.
///
/// Memory only: there is no refresh and nothing is persisted.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) uid: i64,
    pub(crate) secret: RedactedSecret,
}
