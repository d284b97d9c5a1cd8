//! Random shard names.

use rand::RngCore;

use super::ShardShape;

/// Hex characters in the filename stem of a generated name.
pub const NAME_STEM_LEN: usize = 26;

impl ShardShape {
    /// Bytes drawn from the random source for one name.
    pub fn random_bytes_len(&self) -> usize {
        (self.depth() * self.length() + NAME_STEM_LEN).div_ceil(2)
    }

    /// Mint a relative path such as `3f/a0/9c/<stem>` from `rng`.
    ///
    /// The bytes are hex encoded and cut into `depth` chunks of `length`
    /// characters; whatever is left becomes the filename stem. No extension is
    /// appended. The output always satisfies [`ShardShape::valid_dir_structure`].
    pub fn random_name<R: RngCore + ?Sized>(&self, rng: &mut R) -> String {
        let mut buf = vec![0u8; self.random_bytes_len()];
        rng.fill_bytes(&mut buf);
        let hex = hex::encode(buf);

        let dirs_len = self.depth() * self.length();
        let mut name = String::with_capacity(hex.len() + self.depth());
        for start in (0..dirs_len).step_by(self.length()) {
            name.push_str(&hex[start..start + self.length()]);
            name.push('/');
        }
        name.push_str(&hex[dirs_len..]);
        name
    }
}
