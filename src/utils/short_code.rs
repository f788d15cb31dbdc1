use nanoid::nanoid;

pub const SHORT_CODE_LEN: usize = 8;

/// Random URL-safe code. Uniqueness is settled by the store's unique index.
pub fn generate_short_code() -> String {
    nanoid!(SHORT_CODE_LEN)
}
