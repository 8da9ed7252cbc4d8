use super::*;

#[test]
fn search_input_edits_at_the_cursor() {
    let mut input = Input::default();
    for c in "ngnx".chars() {
        input.insert_char(c);
    }
    input.move_left();
    input.move_left();
    input.insert_char('i');
    assert_eq!(input.buf, "nginx");
    assert_eq!(input.column(), 3);

    input.backspace();
    input.delete();
    assert_eq!(input.buf, "ngx");
    input.clear();
    assert_eq!(input.cursor, 0);
}

#[test]
fn multibyte_chars_keep_the_cursor_on_boundaries() {
    let mut buf = String::from("ä");
    let mut cursor = buf.len();
    insert_char(&mut buf, &mut cursor, 'ß');
    assert_eq!(buf, "äß");
    move_left(&buf, &mut cursor);
    assert_eq!(cursor, 'ä'.len_utf8());
    backspace(&mut buf, &mut cursor);
    assert_eq!(buf, "ß");
    assert_eq!(cursor, 0);
    move_right(&buf, &mut cursor);
    assert_eq!(cursor, buf.len());
}

#[test]
fn vertical_moves_keep_the_column_when_possible() {
    let buf = "[Unit]\nA\n[Service]";
    let mut cursor = 4; // inside "[Unit]"
    move_vertical(buf, &mut cursor, true);
    assert_eq!(line_col(buf, cursor), (1, 1));
    move_vertical(buf, &mut cursor, true);
    assert_eq!(line_col(buf, cursor), (2, 1));
    move_vertical(buf, &mut cursor, true);
    assert_eq!(line_col(buf, cursor), (2, 1));
    move_vertical(buf, &mut cursor, false);
    move_vertical(buf, &mut cursor, false);
    assert_eq!(line_col(buf, cursor), (0, 1));
}
