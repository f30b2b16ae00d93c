//! End-to-end session flows over the wire contract: JSON events in,
//! JSON commands out, with positions cross-checked against the board
//! engine.

use assert_matches::assert_matches;
use serde_json::json;
use tempo_board::{BoardPosition, PromotionPiece, Square};
use tempo_client::{ChannelTransport, MoveOutcome, SessionClient};
use tempo_core::events::{ClientCommand, ServerEvent};
use tempo_core::ids::UserId;
use tokio::sync::mpsc::UnboundedReceiver;

const ME: &str = "u-me";
const OPP: &str = "u-opp";

fn new_client() -> (SessionClient<ChannelTransport>, UnboundedReceiver<ClientCommand>) {
    let (transport, rx) = ChannelTransport::new();
    (SessionClient::new(UserId::from(ME), transport), rx)
}

fn room_joined(seat: &str, moves: serde_json::Value) -> ServerEvent {
    serde_json::from_value(json!({
        "type": "room-joined",
        "roomId": "room-1",
        "players": [
            { "userId": ME, "seat": "white" },
            { "userId": OPP, "seat": "black" }
        ],
        "seat": seat,
        "moves": moves,
    }))
    .unwrap()
}

fn confirmed(index: u32, uci: &str, san: &str, fen: &str, actor: &str) -> ServerEvent {
    serde_json::from_value(json!({
        "type": "opponent-move",
        "move": uci,
        "san": san,
        "fen": fen,
        "index": index,
        "actor": actor,
        "ts": "2026-03-01T12:00:00Z",
    }))
    .unwrap()
}

/// SAN and FEN for each move of a line, computed by the engine itself.
fn line(ucis: &[&str]) -> Vec<(String, String)> {
    let mut pos = BoardPosition::new();
    ucis.iter()
        .map(|uci| {
            let applied = pos.apply_uci(&uci.parse().unwrap()).unwrap();
            (applied.san, applied.fen)
        })
        .collect()
}

fn drain(rx: &mut UnboundedReceiver<ClientCommand>) -> Vec<ClientCommand> {
    let mut out = Vec::new();
    while let Ok(cmd) = rx.try_recv() {
        out.push(cmd);
    }
    out
}

#[tokio::test]
async fn review_cursor_freezes_display_while_ledger_grows() {
    let (mut client, mut rx) = new_client();
    client
        .handle_event(room_joined("white", json!([])))
        .unwrap();

    let moves = line(&["e2e4", "e7e5", "g1f3", "b8c6"]);

    // Our first move goes out optimistically and comes back as an echo.
    assert_matches!(
        client.try_move(Square::E2, Square::E4),
        Ok(MoveOutcome::Sent)
    );
    client
        .handle_event(confirmed(0, "e2e4", &moves[0].0, &moves[0].1, ME))
        .unwrap();
    // Opponent replies, we develop the knight.
    client
        .handle_event(confirmed(1, "e7e5", &moves[1].0, &moves[1].1, OPP))
        .unwrap();
    assert_matches!(
        client.try_move(Square::G1, Square::F3),
        Ok(MoveOutcome::Sent)
    );
    assert_eq!(client.store().ledger().len(), 3);

    let before: Vec<_> = client.store().ledger().records().to_vec();

    // Review the position after e7e5.
    client.review(1);
    let expected = line(&["e2e4", "e7e5"]).last().unwrap().1.clone();
    assert_eq!(client.displayed_position().unwrap().to_fen(), expected);

    // A confirmed move arrives while we are reviewing: the ledger grows,
    // the displayed position does not.
    client
        .handle_event(confirmed(3, "b8c6", &moves[3].0, &moves[3].1, OPP))
        .unwrap();
    assert_eq!(client.store().ledger().len(), 4);
    assert_eq!(client.displayed_position().unwrap().to_fen(), expected);

    // Back to live: the tip shows.
    client.go_live();
    assert_eq!(client.displayed_position().unwrap().to_fen(), moves[3].1);

    // Cursor navigation never touched the ledger.
    assert_eq!(&before[..], &client.store().ledger().records()[..3]);

    // Exactly our two moves went upstream.
    let sends: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter(|c| matches!(c, ClientCommand::SendMove { .. }))
        .collect();
    assert_eq!(sends.len(), 2);
}

#[tokio::test]
async fn promotion_holds_the_move_until_a_piece_is_chosen() {
    let (mut client, mut rx) = new_client();
    client
        .handle_event(room_joined(
            "white",
            json!([{
                "move": "h6g7",
                "san": "hxg7",
                "fen": "k7/6P1/8/8/8/8/8/K7 w - - 0 9",
                "index": 0,
                "actor": ME,
                "ts": "2026-03-01T12:00:00Z",
            }]),
        ))
        .unwrap();
    let _ = drain(&mut rx);

    assert_matches!(
        client.try_move(Square::G7, Square::G8),
        Ok(MoveOutcome::AwaitingPromotion)
    );
    assert!(client.awaiting_promotion());
    assert!(drain(&mut rx).is_empty(), "nothing may be sent while held");
    assert_eq!(client.store().ledger().len(), 1);

    client.choose_promotion(PromotionPiece::Queen).unwrap();
    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 1);
    let wire = serde_json::to_value(&sent[0]).unwrap();
    assert_eq!(wire["type"], "send-move");
    assert_eq!(wire["move"], "g7g8q");
    assert_eq!(wire["roomId"], "room-1");

    assert_eq!(client.store().last_move().unwrap().san, "g8=Q");
    assert_eq!(client.store().last_move().unwrap().index, 1);
}

#[tokio::test(start_paused = true)]
async fn playback_walks_to_the_last_move_and_stops() {
    let (mut client, _rx) = new_client();
    client
        .handle_event(room_joined("white", json!([])))
        .unwrap();

    let moves = line(&["e2e4", "e7e5", "g1f3"]);
    for (i, (san, fen)) in moves.iter().enumerate() {
        let uci = ["e2e4", "e7e5", "g1f3"][i];
        client
            .handle_event(confirmed(i as u32, uci, san, fen, OPP))
            .unwrap();
    }

    client.start_playback();
    assert!(client.replay().is_playing());

    // Default interval is one second per step; give the walk room to
    // finish.
    tokio::time::sleep(std::time::Duration::from_secs(5)).await;

    assert!(!client.replay().is_playing());
    assert_eq!(client.replay().cursor(), Some(2));
    assert_eq!(client.displayed_position().unwrap().to_fen(), moves[2].1);
}
