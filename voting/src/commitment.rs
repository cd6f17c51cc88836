//! One-way vote commitments.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use tcr_types::{AccountAddress, CommitmentHash, DomainName, TokenAmount, VoteChoice};

type Blake2b256 = Blake2b<U32>;

const CHOICE_SUPPORT: u8 = 1;
const CHOICE_OPPOSE: u8 = 2;

/// Compute the commitment for a vote.
///
/// Blake2b-256 over domain, voter, choice tag, big-endian weight, and the
/// voter's secret. Binding domain and voter in means identical votes by
/// different voters (or on different challenges) never collide. Domain
/// names and addresses cannot contain NUL, so the separators keep the
/// encoding unambiguous.
pub fn commitment_hash(
    domain: &DomainName,
    voter: &AccountAddress,
    choice: VoteChoice,
    weight: TokenAmount,
    secret: &[u8],
) -> CommitmentHash {
    let tag = match choice {
        VoteChoice::Support => CHOICE_SUPPORT,
        VoteChoice::Oppose => CHOICE_OPPOSE,
    };

    let mut hasher = Blake2b256::new();
    hasher.update(domain.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(voter.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update([tag]);
    hasher.update(weight.to_be_bytes());
    hasher.update(secret);

    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    CommitmentHash::new(output)
}
