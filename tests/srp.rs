use esrp::{Crypto, Group, OpensslCrypto, SrpClient, SrpServer};

fn auth_test(true_pwd: &str, auth_pwd: &str) {
    let username = "alice";
    let group = Group::default_group();

    // Client instance creation
    let client: SrpClient<OpensslCrypto> = SrpClient::new(OpensslCrypto::default(), group);

    // Begin Registration

    let record = client.register(username, true_pwd).unwrap();

    // Client sends the record to the Server for storage

    // Registration Ends

    // Begin Authentication

    // Server instance creation
    let server: SrpServer<OpensslCrypto> = SrpServer::new(OpensslCrypto::default(), group);

    // Server computes a public B value from the stored verifier
    let b = server.engine().crypto().random(64);
    let b_pub = server.compute_public_ephemeral(&b, &record.verifier);

    // Server sends record.salt and b_pub to client

    // Client computes the public A value and its session proof
    let a = client.engine().crypto().random(64);
    let a_pub = client.compute_public_ephemeral(&a);
    let client_session = client
        .process_reply(&a, username, auth_pwd, &record.salt, &b_pub)
        .unwrap();

    // Client sends a_pub and its proof to server (M1)

    // Server processes verification data
    let server_session = server.process_reply(&record, &b, &a_pub).unwrap();
    println!("Client verification on server");
    server_session.verify_client(client_session.proof()).unwrap();

    // Server sends its proof to the client (M2)

    // Client verifies server
    println!("Server verification on client");
    client_session.verify_server(server_session.proof()).unwrap();

    // our keys almost must equal but just an extra check
    assert_eq!(
        server_session.key(),
        client_session.key(),
        "server and client keys are not equal"
    );
}

#[test]
fn good_password() {
    auth_test("password", "password");
}

#[test]
#[should_panic]
fn bad_password() {
    auth_test("password", "paSsword");
}
