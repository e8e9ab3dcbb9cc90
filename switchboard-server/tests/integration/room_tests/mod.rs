mod test_leave_deletes_empty_room;
