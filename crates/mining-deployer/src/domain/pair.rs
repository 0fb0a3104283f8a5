use super::{
    Error,
    eth::{Address, TokenHandle, U160},
};

/// Two distinct tokens ordered the way the exchange addresses pools:
/// `token0` has the numerically smaller address.
///
/// Only [`canonicalize`] constructs pairs, so the ordering always holds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenPair {
    token0: TokenHandle,
    token1: TokenHandle,
}

impl TokenPair {
    pub fn token0(&self) -> &TokenHandle {
        &self.token0
    }

    pub fn token1(&self) -> &TokenHandle {
        &self.token1
    }

    pub fn into_tokens(self) -> (TokenHandle, TokenHandle) {
        (self.token0, self.token1)
    }
}

/// Orders two tokens by their addresses read as 160-bit unsigned integers.
///
/// Addresses are decoded bytes, so the textual case they were configured in
/// does not matter.
pub fn canonicalize(a: TokenHandle, b: TokenHandle) -> Result<TokenPair, Error> {
    let (ia, ib) = (identity(&a.address), identity(&b.address));
    if ia == ib {
        return Err(Error::InvalidPair(a.address));
    }
    let (token0, token1) = if ia < ib { (a, b) } else { (b, a) };
    Ok(TokenPair { token0, token1 })
}

fn identity(address: &Address) -> U160 {
    U160::from_be_slice(address.as_slice())
}
