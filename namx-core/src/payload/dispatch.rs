//! Checksum-name to payload dispatch
//!
//! Given the tx-type name resolved from the code-hash checksum map,
//! decode the data-section bytes into the matching typed payload and
//! pick the primary account address for the account-transaction row.
//! Names without a decoder keep the raw bytes as a hex string and
//! produce no account row.

use namx_types::Address;
use serde_json::Value;

use super::*;
use crate::error::Result;
use crate::wire::Decode;

/// A dispatched payload: the JSON document to store, and the primary
/// address when the payload designates one.
#[derive(Debug, Clone)]
pub struct DecodedPayload {
    pub data: Value,
    pub primary_address: Option<Address>,
}

fn typed<T: serde::Serialize>(value: &T, primary_address: Option<Address>) -> Result<DecodedPayload> {
    Ok(DecodedPayload {
        data: serde_json::to_value(value)?,
        primary_address,
    })
}

fn raw_hex(bytes: &[u8]) -> DecodedPayload {
    DecodedPayload {
        data: Value::String(hex::encode(bytes)),
        primary_address: None,
    }
}

/// Decode the data-section bytes of a successful decrypted tx.
pub fn decode_payload(tx_type_name: &str, bytes: &[u8]) -> Result<DecodedPayload> {
    match tx_type_name {
        "tx_transfer" => {
            let elem = Transfer::decode_all(bytes)?;
            typed(&elem, Some(elem.source))
        }
        "tx_bond" | "tx_unbond" => {
            let elem = Bond::decode_all(bytes)?;
            typed(&elem, Some(elem.source.unwrap_or(elem.validator)))
        }
        "tx_withdraw" => {
            let elem = Withdraw::decode_all(bytes)?;
            typed(&elem, Some(elem.source.unwrap_or(elem.validator)))
        }
        "tx_claim_rewards" => {
            let elem = ClaimRewards::decode_all(bytes)?;
            typed(&elem, Some(elem.source.unwrap_or(elem.validator)))
        }
        "tx_redelegate" => {
            let elem = Redelegation::decode_all(bytes)?;
            typed(&elem, Some(elem.owner))
        }
        "tx_vote_proposal" => {
            let elem = VoteProposalData::decode_all(bytes)?;
            typed(&elem, Some(elem.voter))
        }
        "tx_init_proposal" => {
            let elem = InitProposalData::decode_all(bytes)?;
            typed(&elem, Some(elem.author))
        }
        "tx_update_account" => {
            let elem = UpdateAccount::decode_all(bytes)?;
            typed(&elem, Some(elem.address))
        }
        "tx_become_validator" => {
            let elem = BecomeValidator::decode_all(bytes)?;
            typed(&elem, Some(elem.address))
        }
        "tx_change_consensus_key" => {
            let elem = ConsensusKeyChange::decode_all(bytes)?;
            typed(&elem, Some(elem.validator))
        }
        "tx_change_validator_commission" => {
            let elem = CommissionChange::decode_all(bytes)?;
            typed(&elem, Some(elem.validator))
        }
        "tx_change_validator_metadata" => {
            let elem = MetaDataChange::decode_all(bytes)?;
            typed(&elem, Some(elem.validator))
        }
        "tx_deactivate_validator" | "tx_reactivate_validator" | "tx_unjail_validator" => {
            let elem = Address::decode_all(bytes)?;
            typed(&elem, Some(elem))
        }
        "tx_bridge_pool" => {
            let elem = PendingTransfer::decode_all(bytes)?;
            typed(&elem, Some(elem.transfer.sender))
        }
        "tx_reveal_pk" => {
            let elem = RevealPk::decode_all(bytes)?;
            typed(&elem, None)
        }
        "tx_resign_steward" => {
            let elem = ResignSteward::decode_all(bytes)?;
            typed(&elem, None)
        }
        "tx_update_steward_commission" => {
            let elem = UpdateStewardCommission::decode_all(bytes)?;
            typed(&elem, None)
        }
        "tx_init_account" => {
            let elem = InitAccount::decode_all(bytes)?;
            typed(&elem, None)
        }
        // IBC payloads are foreign protobuf; stored as hex.
        "tx_ibc" => Ok(raw_hex(bytes)),
        _ => Ok(raw_hex(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Encode;
    use namx_types::{
        AddressHash, Amount, DenominatedAmount, EstablishedAddress, ImplicitAddress, Uint,
    };

    fn established(byte: u8) -> Address {
        Address::Established(EstablishedAddress {
            hash: AddressHash([byte; 20]),
        })
    }

    fn implicit(byte: u8) -> Address {
        Address::Implicit(ImplicitAddress(AddressHash([byte; 20])))
    }

    fn transfer_bytes(source: Address, target: Address, token: Address) -> Vec<u8> {
        let mut bytes = Vec::new();
        source.encode(&mut bytes);
        target.encode(&mut bytes);
        token.encode(&mut bytes);
        DenominatedAmount {
            amount: Amount(Uint([1_500_000, 0, 0, 0])),
            denom: 6,
        }
        .encode(&mut bytes);
        Option::<String>::None.encode(&mut bytes);
        Option::<namx_types::Hash>::None.encode(&mut bytes);
        bytes
    }

    #[test]
    fn transfer_dispatch_renders_strings_and_picks_source() {
        let source = implicit(1);
        let bytes = transfer_bytes(source, established(2), established(3));
        let decoded = decode_payload("tx_transfer", &bytes).unwrap();

        assert_eq!(decoded.primary_address, Some(source));
        let object = decoded.data.as_object().unwrap();
        assert_eq!(object["source"], source.to_string());
        assert_eq!(object["amount"], "1.500000");
        assert!(!object.contains_key("key"));
        assert!(!object.contains_key("shielded"));
    }

    #[test]
    fn bond_prefers_source_over_validator() {
        let validator = established(4);
        let source = implicit(5);

        let mut bytes = Vec::new();
        validator.encode(&mut bytes);
        Amount(Uint([10, 0, 0, 0])).encode(&mut bytes);
        Some(source).encode(&mut bytes);
        let decoded = decode_payload("tx_bond", &bytes).unwrap();
        assert_eq!(decoded.primary_address, Some(source));

        let mut bytes = Vec::new();
        validator.encode(&mut bytes);
        Amount(Uint([10, 0, 0, 0])).encode(&mut bytes);
        Option::<Address>::None.encode(&mut bytes);
        let decoded = decode_payload("tx_unbond", &bytes).unwrap();
        assert_eq!(decoded.primary_address, Some(validator));
    }

    #[test]
    fn validator_state_payloads_are_their_own_address() {
        let validator = established(6);
        let bytes = validator.to_bytes();
        for name in [
            "tx_deactivate_validator",
            "tx_reactivate_validator",
            "tx_unjail_validator",
        ] {
            let decoded = decode_payload(name, &bytes).unwrap();
            assert_eq!(decoded.primary_address, Some(validator));
            assert_eq!(decoded.data, Value::String(validator.to_string()));
        }
    }

    #[test]
    fn vote_proposal_renders_vote_name() {
        let voter = implicit(7);
        let mut bytes = Vec::new();
        3u64.encode(&mut bytes);
        bytes.push(0); // Yay
        voter.encode(&mut bytes);
        Vec::<Address>::new().encode(&mut bytes);

        let decoded = decode_payload("tx_vote_proposal", &bytes).unwrap();
        assert_eq!(decoded.primary_address, Some(voter));
        assert_eq!(decoded.data["vote"], "Yay");
        assert_eq!(decoded.data["id"], 3);
    }

    #[test]
    fn unknown_and_ibc_names_fall_back_to_hex() {
        let bytes = [0xde, 0xad, 0xbe, 0xef];
        for name in ["tx_ibc", "tx_something_new"] {
            let decoded = decode_payload(name, &bytes).unwrap();
            assert_eq!(decoded.data, Value::String("deadbeef".to_string()));
            assert!(decoded.primary_address.is_none());
        }
    }

    #[test]
    fn malformed_payload_is_an_error_not_a_partial_value() {
        let err = decode_payload("tx_transfer", &[0x00, 0x01]);
        assert!(err.is_err());
    }
}
