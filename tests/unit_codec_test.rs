use bytes::BytesMut;
use openbatch::core::attrs::{AttrOp, Attrl, BatchOp, MgrCmd, MgrObj};
use openbatch::core::errors::{BatchError, ErrCode};
use openbatch::core::protocol::reply::DelJobStatus;
use openbatch::core::protocol::{
    BatchReply, BatchRequest, BatchStatus, ClientCodec, ReplyBody, ServerCodec, StatKind,
    sort_status,
};
use tokio_util::codec::{Decoder, Encoder};

fn request_round_trip(req: BatchRequest) -> BatchRequest {
    let mut buf = BytesMut::new();
    ClientCodec.encode(req, &mut buf).unwrap();
    ServerCodec.decode(&mut buf).unwrap().expect("full frame")
}

fn reply_round_trip(reply: BatchReply) -> BatchReply {
    let mut buf = BytesMut::new();
    ServerCodec.encode(reply, &mut buf).unwrap();
    ClientCodec.decode(&mut buf).unwrap().expect("full frame")
}

#[test]
fn test_manager_request_round_trip() {
    let req = BatchRequest::Manager {
        cmd: MgrCmd::Set,
        obj: MgrObj::Queue,
        name: "workq".to_string(),
        attrs: vec![
            AttrOp::set("enabled", "true"),
            AttrOp::set_resource("resources_max", "walltime", "24:00:00"),
            AttrOp {
                name: "acl_users".to_string(),
                resource: None,
                value: "alice@h1".to_string(),
                op: BatchOp::Incr,
            },
        ],
        extend: Some("force".to_string()),
    };
    assert_eq!(request_round_trip(req.clone()), req);
}

#[test]
fn test_attr_list_order_preserved() {
    let attrs: Vec<AttrOp> = (0..20)
        .map(|i| AttrOp::set(format!("attr{i}"), format!("v{i}")))
        .collect();
    let req = BatchRequest::Manager {
        cmd: MgrCmd::Set,
        obj: MgrObj::Server,
        name: String::new(),
        attrs: attrs.clone(),
        extend: None,
    };
    match request_round_trip(req) {
        BatchRequest::Manager { attrs: got, .. } => assert_eq!(got, attrs),
        other => panic!("wrong request {other:?}"),
    }
}

#[test]
fn test_status_request_and_reply() {
    let req = BatchRequest::Status {
        kind: StatKind::Queue,
        id: "workq".to_string(),
        filter: vec![Attrl::new("enabled"), Attrl::new("started")],
        extend: None,
    };
    assert_eq!(request_round_trip(req.clone()), req);

    let reply = BatchReply {
        code: ErrCode::None,
        aux: 0,
        body: ReplyBody::Status(vec![BatchStatus {
            name: "workq".to_string(),
            attribs: vec![
                Attrl {
                    name: "enabled".to_string(),
                    resource: None,
                    value: "True".to_string(),
                },
                Attrl {
                    name: "resources_max".to_string(),
                    resource: Some("walltime".to_string()),
                    value: "24:00:00".to_string(),
                },
            ],
            text: Some("note".to_string()),
        }]),
    };
    assert_eq!(reply_round_trip(reply.clone()), reply);
}

#[test]
fn test_error_reply_round_trip() {
    let reply = BatchReply::error(ErrCode::Perm, "Unauthorized Request");
    let got = reply_round_trip(reply);
    assert_eq!(got.code, ErrCode::Perm);
    assert_eq!(got.text(), Some("Unauthorized Request"));
}

#[test]
fn test_delete_list_reply_round_trip() {
    let reply = BatchReply {
        code: ErrCode::None,
        aux: 0,
        body: ReplyBody::DeleteList(vec![
            DelJobStatus {
                name: "1".to_string(),
                code: ErrCode::None,
                text: None,
            },
            DelJobStatus {
                name: "3".to_string(),
                code: ErrCode::HistJobId,
                text: Some("Job 3 has finished".to_string()),
            },
        ]),
    };
    assert_eq!(reply_round_trip(reply.clone()), reply);
}

#[test]
fn test_partial_frame_waits_for_more_data() {
    let req = BatchRequest::LocateJob {
        id: "123.svr".to_string(),
        extend: None,
    };
    let mut buf = BytesMut::new();
    ClientCodec.encode(req, &mut buf).unwrap();

    // Feed the server one byte at a time; only the final byte completes.
    let mut partial = BytesMut::new();
    let total = buf.len();
    for (i, b) in buf.iter().enumerate() {
        partial.extend_from_slice(&[*b]);
        let decoded = ServerCodec.decode(&mut partial).unwrap();
        if i + 1 < total {
            assert!(decoded.is_none(), "decoded early at byte {}", i + 1);
        } else {
            assert!(decoded.is_some());
        }
    }
}

#[test]
fn test_oversized_frame_is_a_protocol_error() {
    let mut buf = BytesMut::new();
    // Claim a body far beyond the limit.
    buf.extend_from_slice(&(u32::MAX).to_be_bytes());
    buf.extend_from_slice(&[0u8; 16]);
    let err = ClientCodec.decode(&mut buf).unwrap_err();
    assert!(matches!(err, BatchError::FrameTooLarge));
}

#[test]
fn test_trailing_garbage_in_frame_rejected() {
    let req = BatchRequest::Disconnect;
    let mut inner = BytesMut::new();
    ClientCodec.encode(req, &mut inner).unwrap();
    // Append a byte inside the declared frame body.
    let mut tampered = BytesMut::new();
    let body_len = u32::from_be_bytes(inner[0..4].try_into().unwrap()) + 1;
    tampered.extend_from_slice(&body_len.to_be_bytes());
    tampered.extend_from_slice(&inner[4..]);
    tampered.extend_from_slice(&[0xFF]);
    let err = ServerCodec.decode(&mut tampered).unwrap_err();
    assert!(matches!(err, BatchError::Protocol(_)));
}

#[test]
fn test_sort_status_is_stable_and_deterministic() {
    let mut list = vec![
        BatchStatus {
            name: "b".to_string(),
            attribs: vec![Attrl::new("first")],
            text: None,
        },
        BatchStatus {
            name: "a".to_string(),
            ..BatchStatus::default()
        },
        BatchStatus {
            name: "b".to_string(),
            attribs: vec![Attrl::new("second")],
            text: None,
        },
    ];
    sort_status(&mut list, |x, y| x.name.cmp(&y.name));
    assert_eq!(list[0].name, "a");
    // Equal keys keep their relative order.
    assert_eq!(list[1].attribs[0].name, "first");
    assert_eq!(list[2].attribs[0].name, "second");
}

#[test]
fn test_find_attr_matches_resource() {
    let bs = BatchStatus {
        name: "q".to_string(),
        attribs: vec![
            Attrl {
                name: "resources_max".to_string(),
                resource: Some("ncpus".to_string()),
                value: "8".to_string(),
            },
            Attrl {
                name: "resources_max".to_string(),
                resource: Some("mem".to_string()),
                value: "4gb".to_string(),
            },
        ],
        text: None,
    };
    assert_eq!(
        bs.find_attr("resources_max", Some("mem")).unwrap().value,
        "4gb"
    );
    assert!(bs.find_attr("resources_max", None).is_none());
}
