use ethers::contract::{parse_log, EthEvent};
use ethers::types::{Address, Log, U256};

/// ChangeTournamentStatus(uint256,uint8)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "ChangeTournamentStatus")]
pub struct ChangeTournamentStatusEvent {
    pub tournament_id: U256,
    pub status: u8,
}

/// CreateTournament(uint256,address)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "CreateTournament")]
pub struct CreateTournamentEvent {
    pub id: U256,
    pub address: Address,
}

/// CreateUser(address)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "CreateUser")]
pub struct CreateUserEvent {
    pub address: Address,
}

/// DonateTournamentBalance(uint256,address,uint256)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "DonateTournamentBalance")]
pub struct DonateTournamentBalanceEvent {
    pub tournament_id: U256,
    pub address: Address,
    pub amount: U256,
}

/// JoinTournament(uint256,address)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "JoinTournament")]
pub struct JoinTournamentEvent {
    pub id: U256,
    pub address: Address,
}

/// SendPaymentsToWinnersCompleted(uint256)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "SendPaymentsToWinnersCompleted")]
pub struct SendPaymentsToWinnersCompletedEvent {
    pub tournament_id: U256,
}

/// TournamentTransaction(uint256,address)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "TournamentTransaction")]
pub struct TournamentTransactionEvent {
    pub tournament_id: U256,
    pub address: Address,
}

/// RoleGranted(bytes32 indexed,address indexed,address indexed)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "RoleGranted")]
pub struct RoleGrantedEvent {
    #[ethevent(indexed)]
    pub role: [u8; 32],
    #[ethevent(indexed)]
    pub account: Address,
    #[ethevent(indexed)]
    pub sender: Address,
}

/// RoleRevoked(bytes32 indexed,address indexed,address indexed)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "RoleRevoked")]
pub struct RoleRevokedEvent {
    #[ethevent(indexed)]
    pub role: [u8; 32],
    #[ethevent(indexed)]
    pub account: Address,
    #[ethevent(indexed)]
    pub sender: Address,
}

/// RoleAdminChanged(bytes32 indexed,bytes32 indexed,bytes32 indexed)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "RoleAdminChanged")]
pub struct RoleAdminChangedEvent {
    #[ethevent(indexed)]
    pub role: [u8; 32],
    #[ethevent(indexed)]
    pub previous_admin_role: [u8; 32],
    #[ethevent(indexed)]
    pub new_admin_role: [u8; 32],
}

/// OwnershipTransferred(address indexed,address indexed)
#[derive(Debug, Clone, PartialEq, Eq, EthEvent)]
#[ethevent(name = "OwnershipTransferred")]
pub struct OwnershipTransferredEvent {
    #[ethevent(indexed)]
    pub previous_owner: Address,
    #[ethevent(indexed)]
    pub new_owner: Address,
}

/// A decoded tournament contract event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentEvent {
    ChangeTournamentStatus(ChangeTournamentStatusEvent),
    CreateTournament(CreateTournamentEvent),
    CreateUser(CreateUserEvent),
    DonateTournamentBalance(DonateTournamentBalanceEvent),
    JoinTournament(JoinTournamentEvent),
    SendPaymentsToWinnersCompleted(SendPaymentsToWinnersCompletedEvent),
    TournamentTransaction(TournamentTransactionEvent),
    RoleGranted(RoleGrantedEvent),
    RoleRevoked(RoleRevokedEvent),
    RoleAdminChanged(RoleAdminChangedEvent),
    OwnershipTransferred(OwnershipTransferredEvent),
}

impl TournamentEvent {
    /// Decode a log emitted by the tournament contract.
    ///
    /// Returns `None` for logs whose first topic is not one of the known
    /// events, or whose data does not match the event's ABI.
    pub fn decode(log: &Log) -> Option<Self> {
        let topic = *log.topics.first()?;
        let log = log.clone();

        let event = if topic == ChangeTournamentStatusEvent::signature() {
            TournamentEvent::ChangeTournamentStatus(parse_log(log).ok()?)
        } else if topic == CreateTournamentEvent::signature() {
            TournamentEvent::CreateTournament(parse_log(log).ok()?)
        } else if topic == CreateUserEvent::signature() {
            TournamentEvent::CreateUser(parse_log(log).ok()?)
        } else if topic == DonateTournamentBalanceEvent::signature() {
            TournamentEvent::DonateTournamentBalance(parse_log(log).ok()?)
        } else if topic == JoinTournamentEvent::signature() {
            TournamentEvent::JoinTournament(parse_log(log).ok()?)
        } else if topic == SendPaymentsToWinnersCompletedEvent::signature() {
            TournamentEvent::SendPaymentsToWinnersCompleted(parse_log(log).ok()?)
        } else if topic == TournamentTransactionEvent::signature() {
            TournamentEvent::TournamentTransaction(parse_log(log).ok()?)
        } else if topic == RoleGrantedEvent::signature() {
            TournamentEvent::RoleGranted(parse_log(log).ok()?)
        } else if topic == RoleRevokedEvent::signature() {
            TournamentEvent::RoleRevoked(parse_log(log).ok()?)
        } else if topic == RoleAdminChangedEvent::signature() {
            TournamentEvent::RoleAdminChanged(parse_log(log).ok()?)
        } else if topic == OwnershipTransferredEvent::signature() {
            TournamentEvent::OwnershipTransferred(parse_log(log).ok()?)
        } else {
            return None;
        };

        Some(event)
    }

    /// Decode every log of `logs` emitted by `contract`, skipping the rest.
    pub fn decode_all(contract: Address, logs: &[Log]) -> Vec<Self> {
        logs.iter()
            .filter(|log| log.address == contract)
            .filter_map(Self::decode)
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            TournamentEvent::ChangeTournamentStatus(_) => "ChangeTournamentStatus",
            TournamentEvent::CreateTournament(_) => "CreateTournament",
            TournamentEvent::CreateUser(_) => "CreateUser",
            TournamentEvent::DonateTournamentBalance(_) => "DonateTournamentBalance",
            TournamentEvent::JoinTournament(_) => "JoinTournament",
            TournamentEvent::SendPaymentsToWinnersCompleted(_) => "SendPaymentsToWinnersCompleted",
            TournamentEvent::TournamentTransaction(_) => "TournamentTransaction",
            TournamentEvent::RoleGranted(_) => "RoleGranted",
            TournamentEvent::RoleRevoked(_) => "RoleRevoked",
            TournamentEvent::RoleAdminChanged(_) => "RoleAdminChanged",
            TournamentEvent::OwnershipTransferred(_) => "OwnershipTransferred",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{encode, Token};
    use ethers::types::H256;
    use ethers::utils::keccak256;

    fn log(contract: Address, topics: Vec<H256>, data: Vec<Token>) -> Log {
        Log {
            address: contract,
            topics,
            data: encode(&data).into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_event_signature_calculation() {
        assert_eq!(
            CreateTournamentEvent::signature(),
            H256::from(keccak256("CreateTournament(uint256,address)"))
        );
        assert_eq!(
            DonateTournamentBalanceEvent::signature(),
            H256::from(keccak256("DonateTournamentBalance(uint256,address,uint256)"))
        );
    }

    #[test]
    fn test_decode_create_tournament_log() {
        let contract = Address::from_low_u64_be(0xc0ffee);
        let organizer = Address::from_low_u64_be(7);
        let raw = log(
            contract,
            vec![CreateTournamentEvent::signature()],
            vec![Token::Uint(U256::from(3u64)), Token::Address(organizer)],
        );

        let event = TournamentEvent::decode(&raw).expect("known event");
        assert_eq!(
            event,
            TournamentEvent::CreateTournament(CreateTournamentEvent {
                id: U256::from(3u64),
                address: organizer,
            })
        );
        assert_eq!(event.name(), "CreateTournament");
    }

    #[test]
    fn test_decode_indexed_role_granted_log() {
        let contract = Address::from_low_u64_be(0xc0ffee);
        let role = keccak256("ROLE_ORGANIZER");
        let account = Address::from_low_u64_be(8);
        let sender = Address::from_low_u64_be(1);
        let raw = log(
            contract,
            vec![RoleGrantedEvent::signature(), H256::from(role), H256::from(account), H256::from(sender)],
            vec![],
        );

        match TournamentEvent::decode(&raw) {
            Some(TournamentEvent::RoleGranted(granted)) => {
                assert_eq!(granted.role, role);
                assert_eq!(granted.account, account);
                assert_eq!(granted.sender, sender);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_all_skips_foreign_and_unknown_logs() {
        let contract = Address::from_low_u64_be(0xc0ffee);
        let other = Address::from_low_u64_be(0xbad);
        let user = Address::from_low_u64_be(9);

        let logs = vec![
            log(contract, vec![CreateUserEvent::signature()], vec![Token::Address(user)]),
            log(other, vec![CreateUserEvent::signature()], vec![Token::Address(user)]),
            log(contract, vec![H256::from(keccak256("Unknown()"))], vec![]),
        ];

        let events = TournamentEvent::decode_all(contract, &logs);
        assert_eq!(events, vec![TournamentEvent::CreateUser(CreateUserEvent { address: user })]);
    }

    #[test]
    fn test_decode_ownership_and_role_admin_logs() {
        let contract = Address::from_low_u64_be(0xc0ffee);
        let previous_owner = Address::zero();
        let new_owner = Address::from_low_u64_be(1);
        let transferred = log(
            contract,
            vec![OwnershipTransferredEvent::signature(), H256::from(previous_owner), H256::from(new_owner)],
            vec![],
        );
        assert_eq!(
            OwnershipTransferredEvent::signature(),
            H256::from(keccak256("OwnershipTransferred(address,address)"))
        );

        let role = keccak256("ROLE_ORGANIZER");
        let admin_changed = log(
            contract,
            vec![RoleAdminChangedEvent::signature(), H256::from(role), H256::zero(), H256::from(role)],
            vec![],
        );

        let events = TournamentEvent::decode_all(contract, &[transferred, admin_changed]);
        assert_eq!(
            events,
            vec![
                TournamentEvent::OwnershipTransferred(OwnershipTransferredEvent { previous_owner, new_owner }),
                TournamentEvent::RoleAdminChanged(RoleAdminChangedEvent {
                    role,
                    previous_admin_role: [0u8; 32],
                    new_admin_role: role,
                }),
            ]
        );
        assert_eq!(events[0].name(), "OwnershipTransferred");
    }
}
