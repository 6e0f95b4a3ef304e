use std::fmt;

use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

use crate::infrastructure::contracts::events::TournamentEvent;

// ============ CONTRACT RECORDS ============

/// ABI shape of `struct TournamentContract.User`.
pub type UserTuple = (U256, String, bool, U256);

/// ABI shape of `struct TournamentContract.Tournament`.
pub type TournamentTuple = (U256, String, U256, U256, U256, U256, u8, U256);

/// A user record as stored by the tournament contract.
///
/// The contract answers lookups for unknown addresses with a zero-valued
/// record rather than an error, so a lookup can't tell "not registered" apart
/// from "registered with default values". Check [`User::is_unregistered`]
/// before trusting the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: U256,
    pub email: String,
    pub is_organizer: bool,
    pub create_date: U256,
}

impl User {
    /// True when every field holds its zero value.
    pub fn is_unregistered(&self) -> bool {
        self.id.is_zero() && self.email.is_empty() && !self.is_organizer && self.create_date.is_zero()
    }
}

impl From<UserTuple> for User {
    fn from((id, email, is_organizer, create_date): UserTuple) -> Self {
        Self {
            id,
            email,
            is_organizer,
            create_date,
        }
    }
}

/// Tournament status code as emitted by the contract.
///
/// The meaning of each code belongs to the contract. It is only shown and
/// passed back, never interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCode(pub u8);

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status #{}", self.0)
    }
}

/// A tournament record as stored by the tournament contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: U256,
    pub name: String,
    pub entry_fee: U256,
    pub prize: U256,
    pub max_participant_count: U256,
    pub participant_count: U256,
    pub status: StatusCode,
    pub create_date: U256,
}

impl Tournament {
    pub fn is_full(&self) -> bool {
        self.participant_count >= self.max_participant_count
    }
}

impl From<TournamentTuple> for Tournament {
    fn from(
        (id, name, entry_fee, prize, max_participant_count, participant_count, status, create_date): TournamentTuple,
    ) -> Self {
        Self {
            id,
            name,
            entry_fee,
            prize,
            max_participant_count,
            participant_count,
            status: StatusCode(status),
            create_date,
        }
    }
}

/// Arguments of `createTournament`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTournament {
    pub name: String,
    pub entry_fee: U256,
    pub prize: U256,
    pub max_participant_count: U256,
    /// Percentage points per winner position. The contract requires a sum of 100.
    pub prize_distribution: Vec<U256>,
}

impl NewTournament {
    /// A tournament with the default terms: free entry, prize 100, two
    /// participants, 80/20 split.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for NewTournament {
    fn default() -> Self {
        Self {
            name: String::new(),
            entry_fee: U256::zero(),
            prize: U256::from(100u64),
            max_participant_count: U256::from(2u64),
            prize_distribution: vec![U256::from(80u64), U256::from(20u64)],
        }
    }
}

/// Roles managed by the contract's access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    DefaultAdmin,
    Organizer,
    User,
}

impl Role {
    /// Name of the view function returning this role's identifier.
    pub fn getter(&self) -> &'static str {
        match self {
            Role::DefaultAdmin => "DEFAULT_ADMIN_ROLE",
            Role::Organizer => "ROLE_ORGANIZER",
            Role::User => "ROLE_USER",
        }
    }
}

// ============ TRANSACTIONS ============

/// Result of a mined state-changing call.
#[derive(Debug, Clone, PartialEq)]
pub struct TxOutcome {
    pub transaction_hash: H256,
    pub block_number: u64,
    pub events: Vec<TournamentEvent>,
}

impl TxOutcome {
    /// Id of the tournament announced by a `CreateTournament` event, if any.
    pub fn created_tournament_id(&self) -> Option<U256> {
        self.events.iter().find_map(|event| match event {
            TournamentEvent::CreateTournament(created) => Some(created.id),
            _ => None,
        })
    }

    /// Whether a `CreateUser` event for `account` was emitted.
    pub fn created_user(&self, account: Address) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, TournamentEvent::CreateUser(created) if created.address == account))
    }
}

/// State-changing gateway actions, used to guard against duplicate submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    AssignOrganizerRole,
    CreateUser,
    CreateTournament,
    JoinTournament,
    StartTournament,
    CompleteTournament,
    DonateToTournament,
    SendPaymentsToWinners,
    ChangeTournamentStatus,
}

impl Action {
    /// Contract method invoked by this action.
    pub fn method(&self) -> &'static str {
        match self {
            Action::AssignOrganizerRole => "assignOrganizerRoleToUser",
            Action::CreateUser => "createUser",
            Action::CreateTournament => "createTournament",
            Action::JoinTournament => "joinTournament",
            Action::StartTournament => "startTournament",
            Action::CompleteTournament => "completeTournament",
            Action::DonateToTournament => "donateToTournament",
            Action::SendPaymentsToWinners => "sendPaymentsToWinners",
            Action::ChangeTournamentStatus => "changeStatusOfTournament",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_user_is_unregistered() {
        let user = User::from((U256::zero(), String::new(), false, U256::zero()));
        assert!(user.is_unregistered());

        let user = User::from((U256::one(), "a@b.c".to_string(), false, U256::from(1_700_000_000u64)));
        assert!(!user.is_unregistered());
    }

    #[test]
    fn test_new_tournament_defaults() {
        let params = NewTournament::named("Cup");
        assert_eq!(params.name, "Cup");
        assert_eq!(params.entry_fee, U256::zero());
        assert_eq!(params.prize, U256::from(100u64));
        assert_eq!(params.max_participant_count, U256::from(2u64));
        assert_eq!(params.prize_distribution, vec![U256::from(80u64), U256::from(20u64)]);
    }

    #[test]
    fn test_status_code_is_displayed_raw() {
        assert_eq!(StatusCode(2).to_string(), "status #2");
    }
}
