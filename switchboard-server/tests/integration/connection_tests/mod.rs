mod test_disconnect_cleans_up_room;
mod test_idle_connection_closed;
