pub mod attached_signature_code;
pub mod basic;
pub mod self_addressing;
pub mod self_signing;

/// Size table shared by all derivation codes: the code length and the
/// base64url length of the derivative determine the full qb64 length.
pub trait DerivationCode {
    fn code_len(&self) -> usize;
    fn derivative_b64_len(&self) -> usize;
    fn prefix_b64_len(&self) -> usize {
        self.code_len() + self.derivative_b64_len()
    }
    fn to_str(&self) -> String;
}
