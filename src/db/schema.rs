// DDL differs per backend; every query below is shared.
// `codigo`/`turno` compare byte-exact on both backends (SQLite's default
// BINARY collation, utf8mb4_bin on MySQL). `fecha` holds UTC.

pub const MYSQL_SCHEMA: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS registros (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        codigo VARCHAR(64) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
        turno VARCHAR(64) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
        fecha DATETIME(6) NOT NULL,
        dia DATE NOT NULL,
        UNIQUE KEY uq_registros_codigo_turno_dia (codigo, turno, dia),
        KEY idx_registros_turno_dia (turno, dia, fecha)
    )
    "#];

pub const SQLITE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS registros (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        codigo TEXT NOT NULL,
        turno TEXT NOT NULL,
        fecha DATETIME NOT NULL,
        dia DATE NOT NULL,
        UNIQUE (codigo, turno, dia)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_registros_turno_dia
    ON registros (turno, dia, fecha)
    "#,
];

pub const COUNT_TODAY: &str = r#"
    SELECT COUNT(*)
    FROM registros
    WHERE codigo = ? AND turno = ? AND dia = ?
    "#;

pub const INSERT: &str = r#"
    INSERT INTO registros (codigo, turno, fecha, dia)
    VALUES (?, ?, ?, ?)
    "#;

pub const LIST_TODAY: &str = r#"
    SELECT id, codigo, turno, fecha
    FROM registros
    WHERE turno = ? AND dia = ?
    ORDER BY fecha DESC, id DESC
    "#;

pub const PING: &str = "SELECT 1";
