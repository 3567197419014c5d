pub const ACME: &str = "acme";
pub const GITHUB: &str = "github";

pub const ACME_SECRET: &str = "JBSWY3DPEHPK3PXP";
pub const OTHER_SECRET: &str = "NDVP6W4K6HKVUQJUY4F627PCSYUVQSNJF4BBTH2BQT24LONOLSXQ";

// RFC 4226 / RFC 6238 HMAC-SHA-1 test key
pub const RFC_KEY: &[u8] = b"12345678901234567890";

// 1 second before the end of the second time step
pub const MOCK_NOW: u64 = 59;
