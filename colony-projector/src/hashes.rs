use ethers::types::{H160, H256};

pub struct Hashes;

impl Hashes {
    pub fn h160_to_string(h160: &H160) -> String {
        format!("{h160:?}")
    }

    pub fn h256_to_string(h256: &H256) -> String {
        format!("{h256:?}")
    }

    pub fn bytes_to_string(bytes: &[u8]) -> String {
        format!("0x{}", ethers::utils::hex::encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn renders_full_lowercase_addresses() {
        let address = H160::from_str("0xBC4CA0EdA7647A8aB7C2061c2E118A18a936f13D").unwrap();

        assert_eq!(
            Hashes::h160_to_string(&address),
            "0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d"
        );
    }

    #[test]
    fn renders_prefixed_bytes() {
        assert_eq!(Hashes::bytes_to_string(&[0, 3]), "0x0003");
    }
}
