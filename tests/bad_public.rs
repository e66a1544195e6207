use esrp::{
    Crypto, Group, OpensslCrypto, SrpClient, SrpError, SrpServer, UserRecord, Value,
};

fn zero() -> Value {
    Value::from(0u8)
}

#[test]
#[should_panic]
fn bad_a_pub() {
    let server: SrpServer<OpensslCrypto> =
        SrpServer::new(OpensslCrypto::default(), Group::default_group());
    let user = UserRecord {
        username: "alice".to_owned(),
        salt: Value::from(0x1117u32),
        verifier: Value::from(1u8),
    };
    server.process_reply(&user, &Value::from(1u8), &zero()).unwrap();
}

#[test]
#[should_panic]
fn bad_b_pub() {
    let client: SrpClient<OpensslCrypto> =
        SrpClient::new(OpensslCrypto::default(), Group::default_group());
    client
        .process_reply(&Value::from(1u8), "alice", "password", &Value::from(0x1117u32), &zero())
        .unwrap();
}

#[test]
fn a_pub_multiple_of_n_is_rejected() {
    let group = Group::default_group();
    let server: SrpServer<OpensslCrypto> = SrpServer::new(OpensslCrypto::default(), group);
    let user = UserRecord {
        username: "alice".to_owned(),
        salt: Value::from(0x1117u32),
        verifier: Value::from(1u8),
    };
    let n = Value::from_int(group.n.clone());
    assert_eq!(
        server.process_reply(&user, &Value::from(1u8), &n).err(),
        Some(SrpError::IllegalParameter { name: "a_pub" })
    );
}

// A provider whose digest is identically zero forces u = 0; the client must
// refuse to continue rather than derive a key an eavesdropper can predict.
#[derive(Clone)]
struct ZeroDigest;

impl Crypto for ZeroDigest {
    fn h(&self, _values: &[&Value]) -> Value {
        Value::from_bytes(vec![0u8; 32])
    }

    fn keyed_hash(&self, _key: &Value, _msg: &Value) -> Value {
        Value::from_bytes(vec![0u8; 32])
    }

    fn password_hash(&self, _salt: &Value, _password: &str) -> Result<Value, SrpError> {
        Ok(Value::from_bytes(vec![0u8; 32]))
    }

    fn secure_compare(&self, a: &Value, b: &Value) -> bool {
        a == b
    }

    fn digest_len(&self) -> usize {
        32
    }
}

#[test]
fn zero_u_is_rejected() {
    let client: SrpClient<ZeroDigest> = SrpClient::new(ZeroDigest, Group::default_group());
    let result = client.process_reply(
        &Value::from(1u8),
        "alice",
        "password",
        &Value::from(0x1117u32),
        &Value::from(2u8),
    );
    assert_eq!(result.err(), Some(SrpError::IllegalParameter { name: "u" }));
}
