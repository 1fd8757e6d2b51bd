mod test_disconnect_cleans_up;
mod test_peer_receives_identity;
