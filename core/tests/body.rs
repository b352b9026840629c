use ledger_ada_core::{
    address,
    body::{keys, UnsignedTransactionBody},
    certificate::{Certificate, CertificateType},
    path::{harden, DerivationPath},
    plan::{CertificateRequest, PlanInput, PlanOutput, TxPlan, WithdrawalRequest},
    Error, SignedTransaction, TxId, TxInput, TxOutput, Withdrawal, Witness, WitnessSet,
};
use serde_cbor::Value;

lazy_static::lazy_static! {
    static ref CHANGE_ADDRESS: String = enterprise_address(0x0c);
    static ref FOREIGN_ADDRESS: String = enterprise_address(0x0f);
    static ref STAKE_ADDRESS: String = reward_address(0x33);
    static ref CHANGE_PATH: DerivationPath =
        DerivationPath::from([harden(1852), harden(1815), harden(0), 1, 0]);
}

/// Expected encoding of the reference transaction body
const EXAMPLE_BODY_HEX: &str = "a40081825820aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa00018282581d610c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c1a000aae6082581d610f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f1a00046cd002192710031a0007a120";

/// blake2b-256 of [EXAMPLE_BODY_HEX]
const EXAMPLE_TX_ID: &str = "5e03e885e5c48549beada7af01b0efa012e265d0aa84943c679c6d6ea32dfef1";

fn enterprise_address(fill: u8) -> String {
    let mut raw = vec![0x61];
    raw.extend_from_slice(&[fill; 28]);
    address::encode("addr", &raw).unwrap()
}

fn reward_address(fill: u8) -> String {
    let mut raw = vec![0xe1];
    raw.extend_from_slice(&[fill; 28]);
    address::encode("stake", &raw).unwrap()
}

fn input_path() -> DerivationPath {
    DerivationPath::from([harden(1852), harden(1815), harden(0), 0, 0])
}

fn example_plan() -> TxPlan {
    TxPlan {
        inputs: vec![PlanInput {
            address: enterprise_address(0x0a),
            amount: 1_000_000,
            id: "aa".repeat(32),
            index: 0,
            derivation_path: input_path(),
        }],
        outputs: vec![
            PlanOutput {
                address: CHANGE_ADDRESS.clone(),
                amount: 700_000,
                derivation_path: Some(CHANGE_PATH.clone()),
            },
            PlanOutput {
                address: FOREIGN_ADDRESS.clone(),
                amount: 290_000,
                derivation_path: None,
            },
        ],
        fee: 10_000,
        ttl: 500_000,
        certificates: vec![],
        withdrawals: vec![],
    }
}

fn map_keys(encoded: &[u8]) -> Vec<i128> {
    match serde_cbor::from_slice::<Value>(encoded).unwrap() {
        Value::Map(m) => m
            .keys()
            .map(|k| match k {
                Value::Integer(i) => *i,
                _ => panic!("non-integer body key"),
            })
            .collect(),
        v => panic!("body is not a map: {v:?}"),
    }
}

#[test]
fn reference_transaction() -> anyhow::Result<()> {
    let body = UnsignedTransactionBody::from_plan(&example_plan(), None)?;

    assert_eq!(hex::encode(body.encoded()), EXAMPLE_BODY_HEX);
    assert_eq!(body.id().to_hex(), EXAMPLE_TX_ID);
    assert_eq!(map_keys(body.encoded()), vec![0, 1, 2, 3]);

    // Reproducible across builds
    let again = UnsignedTransactionBody::from_plan(&example_plan(), None)?;
    assert_eq!(again.id(), body.id());
    assert_eq!(again.encoded(), body.encoded());

    Ok(())
}

#[test]
fn change_output_metadata_from_plan() -> anyhow::Result<()> {
    let body = UnsignedTransactionBody::from_plan(&example_plan(), None)?;

    let change = &body.outputs()[0];
    assert!(change.is_change());
    assert_eq!(change.spending_path(), Some(&*CHANGE_PATH));
    assert_eq!(
        change.staking_path().map(|p| p.to_string()),
        Some("m/1852'/1815'/0'/2/0".to_string())
    );

    let foreign = &body.outputs()[1];
    assert!(!foreign.is_change());
    assert_eq!(foreign.spending_path(), None);
    assert_eq!(foreign.address_bytes().len(), 29);

    // Configured staking path overrides the account default, without altering the id
    let configured = DerivationPath::from([harden(1852), harden(1815), harden(7), 2, 0]);
    let b = UnsignedTransactionBody::from_plan(&example_plan(), Some(&configured))?;
    assert_eq!(b.outputs()[0].staking_path(), Some(&configured));
    assert_eq!(b.id(), body.id());

    Ok(())
}

#[test]
fn certificates_present_only_when_non_empty() -> anyhow::Result<()> {
    let mut plan = example_plan();
    plan.certificates.push(CertificateRequest {
        certificate_type: CertificateType::StakeKeyRegistration,
        stake_address: STAKE_ADDRESS.clone(),
        pool_id: None,
        signing_path: None,
    });

    let body = UnsignedTransactionBody::from_plan(&plan, None)?;
    assert_eq!(map_keys(body.encoded()), vec![0, 1, 2, 3, 4]);
    assert_eq!(body.encoded()[0], 0xa5);

    // Signing path falls back to the account staking key of the first input
    assert_eq!(
        body.certificates()[0].signing_path().to_string(),
        "m/1852'/1815'/0'/2/0"
    );

    let base = UnsignedTransactionBody::from_plan(&example_plan(), None)?;
    assert_eq!(base.encoded()[0], 0xa4);
    assert_ne!(base.id(), body.id());

    Ok(())
}

#[test]
fn withdrawals_sorted_and_complete() -> anyhow::Result<()> {
    let a = reward_address(0x02);
    let b = reward_address(0x01);

    let mut plan = example_plan();
    plan.withdrawals = vec![
        WithdrawalRequest {
            stake_address: a.clone(),
            amount: 5,
        },
        WithdrawalRequest {
            stake_address: b.clone(),
            amount: 6,
        },
    ];

    let body = UnsignedTransactionBody::from_plan(&plan, None)?;
    assert_eq!(map_keys(body.encoded()), vec![0, 1, 2, 3, 5]);
    assert_eq!(body.withdrawals().len(), 2);
    assert_eq!(body.withdrawals()[0].reward_address(), b);

    let v: Value = serde_cbor::from_slice(body.encoded())?;
    let withdrawals = match v {
        Value::Map(m) => m.get(&Value::Integer(keys::WITHDRAWALS as i128)).cloned(),
        _ => None,
    };
    match withdrawals {
        Some(Value::Map(m)) => assert_eq!(m.len(), 2),
        w => panic!("unexpected withdrawals: {w:?}"),
    }

    // Duplicate reward accounts are rejected
    plan.withdrawals.push(WithdrawalRequest {
        stake_address: a,
        amount: 1,
    });
    assert!(matches!(
        UnsignedTransactionBody::from_plan(&plan, None),
        Err(Error::Encoding(_))
    ));

    Ok(())
}

#[test]
fn builder_order_does_not_change_id() -> anyhow::Result<()> {
    let i = TxInput::new(&"aa".repeat(32), 0, 1_000_000, input_path())?;
    let c = TxOutput::change(&CHANGE_ADDRESS, 700_000, CHANGE_PATH.clone(), None)?;
    let f = TxOutput::foreign(&FOREIGN_ADDRESS, 290_000)?;

    let a = UnsignedTransactionBody::builder()
        .input(i.clone())
        .output(c.clone())
        .output(f.clone())
        .fee(10_000)
        .ttl(500_000)
        .build()?;

    let b = UnsignedTransactionBody::builder()
        .ttl(500_000)
        .fee(10_000)
        .output(c)
        .input(i)
        .output(f)
        .build()?;

    assert_eq!(a.id(), b.id());
    assert_eq!(a.id(), TxId::from_hex(EXAMPLE_TX_ID)?);

    Ok(())
}

#[test]
fn missing_required_fields() -> anyhow::Result<()> {
    let i = TxInput::new(&"aa".repeat(32), 0, 1_000_000, input_path())?;
    let f = TxOutput::foreign(&FOREIGN_ADDRESS, 290_000)?;

    let cases = [
        UnsignedTransactionBody::builder()
            .output(f.clone())
            .fee(1)
            .ttl(1)
            .build(),
        UnsignedTransactionBody::builder()
            .input(i.clone())
            .fee(1)
            .ttl(1)
            .build(),
        UnsignedTransactionBody::builder()
            .input(i.clone())
            .output(f.clone())
            .ttl(1)
            .build(),
        UnsignedTransactionBody::builder()
            .input(i)
            .output(f)
            .fee(1)
            .build(),
    ];

    for c in cases {
        assert!(matches!(c, Err(Error::Encoding(_))));
    }

    Ok(())
}

#[test]
fn signed_transaction_keeps_body_id() -> anyhow::Result<()> {
    let body = UnsignedTransactionBody::from_plan(&example_plan(), None)?;
    let id = body.id();

    let witnesses: WitnessSet = [
        Witness::new([0x01; 32], [0x02; 64]),
        Witness::new([0x03; 32], [0x04; 64]),
    ]
    .into_iter()
    .collect();

    let signed = SignedTransaction::new(body.clone(), witnesses);
    assert_eq!(signed.id(), id);

    let bytes = signed.to_bytes()?;

    // [body, {0: [..]}, null]
    assert_eq!(bytes[0], 0x83);
    assert_eq!(&bytes[1..1 + body.encoded().len()], body.encoded());
    let rest = &bytes[1 + body.encoded().len()..];
    assert_eq!(&rest[..3], &[0xa1, 0x00, 0x82]);
    assert_eq!(rest[rest.len() - 1], 0xf6);

    assert_eq!(signed.to_hex()?, hex::encode(&bytes));

    Ok(())
}

#[test]
fn signed_transaction_metadata_slot() -> anyhow::Result<()> {
    let body = UnsignedTransactionBody::from_plan(&example_plan(), None)?;
    let w: WitnessSet = [Witness::new([0x01; 32], [0x02; 64])].into_iter().collect();

    let signed = SignedTransaction::with_metadata(body.clone(), w, Value::Integer(7));
    assert_eq!(signed.id(), body.id());

    let bytes = signed.to_bytes()?;
    assert_eq!(bytes[bytes.len() - 1], 0x07);

    Ok(())
}

#[test]
fn certificate_signing_path_explicit() -> anyhow::Result<()> {
    let path = DerivationPath::from([harden(1852), harden(1815), harden(2), 2, 0]);
    let c = Certificate::new(
        CertificateType::StakeDelegation,
        &STAKE_ADDRESS,
        Some(&"ab".repeat(28)),
        path.clone(),
    )?;

    let body = UnsignedTransactionBody::builder()
        .input(TxInput::new(&"aa".repeat(32), 0, 1, input_path())?)
        .output(TxOutput::foreign(&FOREIGN_ADDRESS, 1)?)
        .fee(1)
        .ttl(1)
        .certificate(c)
        .withdrawal(Withdrawal::new(&STAKE_ADDRESS, 10)?)
        .build()?;

    assert_eq!(body.signing_paths(), vec![input_path(), path]);
    assert_eq!(map_keys(body.encoded()), vec![0, 1, 2, 3, 4, 5]);

    Ok(())
}
