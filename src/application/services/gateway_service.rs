use std::sync::Arc;

use ethers::types::{Address, U256};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::application::services::in_flight::InFlight;
use crate::domain::{Action, GatewayError, NewTournament, Role, StatusCode, Tournament, TxOutcome, User};
use crate::infrastructure::contracts::config::GatewayConfig;
use crate::infrastructure::contracts::ledger::TournamentLedger;
use crate::infrastructure::contracts::types::{ContractBinding, NativeCurrency};
use crate::infrastructure::wallet::{NodeWallet, Wallet};
use crate::utils::units;

/// Session state, rebuilt for every gateway.
enum Session<L> {
    Disconnected,
    Connected { account: Address },
    Bound { account: Address, ledger: Arc<L> },
}

/// The client-side gateway to the tournament contract.
///
/// Holds the {provider, signer, contract} session: `connect_wallet` picks the
/// account, `bind_contract` builds the signer-backed contract handle, and every
/// other operation is one call through that handle. Operations attempted
/// before binding fail with `NotBound` without touching the network.
pub struct ContractGateway<W: Wallet> {
    wallet: Option<W>,
    binding: ContractBinding,
    currency: NativeCurrency,
    session: RwLock<Session<W::Ledger>>,
    in_flight: InFlight,
}

impl ContractGateway<NodeWallet> {
    /// Create a gateway from configuration, detecting the wallet.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let wallet = NodeWallet::detect(config)?;
        Ok(Self::new(wallet, config.binding()?, config.network.native_currency.clone()))
    }
}

impl<W: Wallet> ContractGateway<W> {
    /// `wallet` is `None` when no wallet is present; connecting then fails
    /// with `WalletUnavailable`.
    pub fn new(wallet: Option<W>, binding: ContractBinding, currency: NativeCurrency) -> Self {
        Self {
            wallet,
            binding,
            currency,
            session: RwLock::new(Session::Disconnected),
            in_flight: InFlight::new(),
        }
    }

    // ============ SESSION ============

    /// Request account access and remember the active account.
    ///
    /// Reconnecting drops any existing contract binding.
    pub async fn connect_wallet(&self) -> Result<Address, GatewayError> {
        let wallet = self.wallet.as_ref().ok_or(GatewayError::WalletUnavailable)?;

        let accounts = wallet.request_accounts().await.inspect_err(|e| {
            warn!(error = %e, "wallet connection failed");
        })?;
        let account = accounts.first().copied().ok_or(GatewayError::UserRejected)?;

        *self.session.write().await = Session::Connected { account };
        info!(account = ?account, "connectWallet | account");
        Ok(account)
    }

    /// Bind the contract to the connected wallet's signer.
    pub async fn bind_contract(&self) -> Result<Address, GatewayError> {
        let wallet = self.wallet.as_ref().ok_or(GatewayError::WalletUnavailable)?;
        let account = self.account().await.ok_or(GatewayError::NotConnected)?;

        let ledger = wallet.bind(account, &self.binding).await?;

        *self.session.write().await = Session::Bound {
            account,
            ledger: Arc::new(ledger),
        };
        info!(account = ?account, contract = ?self.binding.address, "bindContract | bound");
        Ok(self.binding.address)
    }

    /// The connected account, if any.
    pub async fn account(&self) -> Option<Address> {
        match &*self.session.read().await {
            Session::Disconnected => None,
            Session::Connected { account } | Session::Bound { account, .. } => Some(*account),
        }
    }

    pub async fn is_bound(&self) -> bool {
        matches!(&*self.session.read().await, Session::Bound { .. })
    }

    pub fn contract_address(&self) -> Address {
        self.binding.address
    }

    pub fn currency(&self) -> &NativeCurrency {
        &self.currency
    }

    /// Whether a submission of `action` is still pending.
    pub fn is_pending(&self, action: Action) -> bool {
        self.in_flight.is_pending(action)
    }

    async fn ledger(&self) -> Result<Arc<W::Ledger>, GatewayError> {
        match &*self.session.read().await {
            Session::Bound { ledger, .. } => Ok(Arc::clone(ledger)),
            _ => Err(GatewayError::NotBound),
        }
    }

    // ============ USERS AND ROLES ============

    pub async fn assign_organizer_role(&self, account: Address) -> Result<TxOutcome, GatewayError> {
        let ledger = self.ledger().await?;
        let _permit = self.in_flight.begin(Action::AssignOrganizerRole)?;

        let outcome = report(Action::AssignOrganizerRole, ledger.assign_organizer_role(account).await)?;
        info!(account = ?account, tx = ?outcome.transaction_hash, "assignOrganizerRoleToUser | result");
        Ok(outcome)
    }

    /// Register the caller with `email` and return the stored record.
    ///
    /// If the record can't be read after the transaction is mined, the error is
    /// `ReadBack` carrying the transaction hash: the user exists on-chain.
    pub async fn create_user(&self, email: &str) -> Result<User, GatewayError> {
        let ledger = self.ledger().await?;
        let _permit = self.in_flight.begin(Action::CreateUser)?;

        let outcome = report(Action::CreateUser, ledger.create_user(email).await)?;
        if !outcome.created_user(ledger.caller()) {
            debug!(tx = ?outcome.transaction_hash, "CreateUser event not found in receipt");
        }

        let user = read_back(Action::CreateUser, &outcome, ledger.get_user(ledger.caller()).await)?;
        info!(user_id = %user.id, tx = ?outcome.transaction_hash, "createUser | result");
        Ok(user)
    }

    /// Look up the user record of `account`.
    ///
    /// Unregistered addresses come back as a zero-valued record; see
    /// [`User::is_unregistered`].
    pub async fn get_user(&self, account: Address) -> Result<User, GatewayError> {
        let ledger = self.ledger().await?;

        let user = ledger.get_user(account).await?;
        if user.is_unregistered() {
            warn!(account = ?account, "getUser | zero-valued record, address may not be registered");
        } else {
            debug!(account = ?account, user_id = %user.id, "getUser | result");
        }
        Ok(user)
    }

    pub async fn has_role(&self, role: Role, account: Address) -> Result<bool, GatewayError> {
        let ledger = self.ledger().await?;

        let role_id = ledger.role_id(role).await?;
        ledger.has_role(role_id, account).await
    }

    pub async fn user_count(&self) -> Result<U256, GatewayError> {
        self.ledger().await?.user_count().await
    }

    // ============ TOURNAMENTS ============

    /// Create a tournament with the caller as organizer.
    ///
    /// The prize distribution is not checked here; the contract rejects
    /// distributions that don't sum to 100. A failed read of the new record
    /// after mining is reported as `ReadBack`; the tournament exists regardless.
    pub async fn create_tournament(&self, params: NewTournament) -> Result<Tournament, GatewayError> {
        let ledger = self.ledger().await?;
        let _permit = self.in_flight.begin(Action::CreateTournament)?;

        let outcome = report(Action::CreateTournament, ledger.create_tournament(&params).await)?;
        let id = outcome.created_tournament_id().ok_or_else(|| {
            GatewayError::Abi(format!(
                "CreateTournament event missing from receipt of {:?}",
                outcome.transaction_hash
            ))
        })?;

        let tournament = read_back(Action::CreateTournament, &outcome, ledger.get_tournament(id).await)
            .inspect_err(|_| warn!(tournament_id = %id, "createTournament | created, record unreadable"))?;
        info!(tournament_id = %id, name = %tournament.name, tx = ?outcome.transaction_hash, "createTournament | result");
        Ok(tournament)
    }

    pub async fn get_tournament(&self, id: U256) -> Result<Tournament, GatewayError> {
        let tournament = self.ledger().await?.get_tournament(id).await?;
        debug!(tournament_id = %id, status = %tournament.status, "getTournament | result");
        Ok(tournament)
    }

    pub async fn join_tournament(&self, id: U256, participant: Address) -> Result<TxOutcome, GatewayError> {
        let ledger = self.ledger().await?;
        let _permit = self.in_flight.begin(Action::JoinTournament)?;

        let outcome = report(Action::JoinTournament, ledger.join_tournament(id, participant).await)?;
        info!(tournament_id = %id, participant = ?participant, tx = ?outcome.transaction_hash, "joinTournament | result");
        Ok(outcome)
    }

    pub async fn start_tournament(&self, id: U256) -> Result<TxOutcome, GatewayError> {
        let ledger = self.ledger().await?;
        let _permit = self.in_flight.begin(Action::StartTournament)?;

        let outcome = report(Action::StartTournament, ledger.start_tournament(id).await)?;
        info!(tournament_id = %id, tx = ?outcome.transaction_hash, "startTournament | result");
        Ok(outcome)
    }

    /// Complete a started tournament. Winner order decides the payout split.
    pub async fn complete_tournament(&self, id: U256, winners: &[Address]) -> Result<TxOutcome, GatewayError> {
        let ledger = self.ledger().await?;
        let _permit = self.in_flight.begin(Action::CompleteTournament)?;

        let outcome = report(Action::CompleteTournament, ledger.complete_tournament(id, winners).await)?;
        info!(tournament_id = %id, winners = winners.len(), tx = ?outcome.transaction_hash, "completeTournament | result");
        Ok(outcome)
    }

    /// Pass a raw status code to `changeStatusOfTournament`.
    pub async fn change_tournament_status(&self, id: U256, status: StatusCode) -> Result<TxOutcome, GatewayError> {
        let ledger = self.ledger().await?;
        let _permit = self.in_flight.begin(Action::ChangeTournamentStatus)?;

        let outcome = report(Action::ChangeTournamentStatus, ledger.change_tournament_status(id, status).await)?;
        info!(tournament_id = %id, status = %status, tx = ?outcome.transaction_hash, "changeStatusOfTournament | result");
        Ok(outcome)
    }

    pub async fn is_participant(&self, id: U256, account: Address) -> Result<bool, GatewayError> {
        self.ledger().await?.is_participant(id, account).await
    }

    pub async fn tournament_organizer(&self, id: U256) -> Result<Address, GatewayError> {
        self.ledger().await?.tournament_organizer(id).await
    }

    pub async fn tournament_count(&self) -> Result<U256, GatewayError> {
        self.ledger().await?.tournament_count().await
    }

    // ============ FUNDS ============

    /// Donate `amount`, a decimal in the display unit (e.g. `"12"` ETH).
    pub async fn donate_to_tournament(&self, id: U256, amount: &str) -> Result<TxOutcome, GatewayError> {
        let ledger = self.ledger().await?;
        let value = units::parse_amount(amount, self.currency.decimals)?;
        let _permit = self.in_flight.begin(Action::DonateToTournament)?;

        let outcome = report(Action::DonateToTournament, ledger.donate_to_tournament(id, value).await)?;
        info!(
            tournament_id = %id,
            amount = %amount,
            symbol = %self.currency.symbol,
            tx = ?outcome.transaction_hash,
            "donateToTournament | result"
        );
        Ok(outcome)
    }

    /// Tournament balance formatted in the display unit.
    pub async fn get_tournament_balance(&self, id: U256) -> Result<String, GatewayError> {
        let balance = self.ledger().await?.get_tournament_balance(id).await?;
        let formatted = units::format_amount(balance, self.currency.decimals)?;
        debug!(tournament_id = %id, balance = %formatted, "getTournamentBalance | result");
        Ok(formatted)
    }

    /// Pay the recorded winners of a completed tournament.
    pub async fn send_payments_to_winners(&self, id: U256) -> Result<TxOutcome, GatewayError> {
        let ledger = self.ledger().await?;
        let _permit = self.in_flight.begin(Action::SendPaymentsToWinners)?;

        let outcome = report(Action::SendPaymentsToWinners, ledger.send_payments_to_winners(id).await)?;
        info!(tournament_id = %id, tx = ?outcome.transaction_hash, "sendPaymentsToWinners | result");
        Ok(outcome)
    }

    /// Total balance held by the contract, formatted in the display unit.
    pub async fn contract_balance(&self) -> Result<String, GatewayError> {
        let balance = self.ledger().await?.contract_balance().await?;
        units::format_amount(balance, self.currency.decimals)
    }
}

fn report<T>(action: Action, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
    result.inspect_err(|e| warn!(action = %action, error = %e, "{} failed", action))
}

fn read_back<T>(action: Action, outcome: &TxOutcome, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
    result.map_err(|e| GatewayError::ReadBack {
        action,
        transaction_hash: outcome.transaction_hash,
        source: Box::new(e),
    })
}
