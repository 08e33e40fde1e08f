//! SQL schema for the feedback SQLite store.
//!
//! Initialisation always starts from scratch: existing tables are dropped and
//! recreated inside one transaction.

/// Drop all tables, children first. Their indexes and triggers go with them.
pub const DROP_TABLES: &str = "
DROP TABLE IF EXISTS Rankings;
DROP TABLE IF EXISTS Translations;
DROP TABLE IF EXISTS Targets;
";

/// Delete every row, children first.
pub const CLEAR_TABLES: &str = "
DELETE FROM Rankings;
DELETE FROM Translations;
DELETE FROM Targets;
";

/// Table, index and trigger DDL. Run after [`DROP_TABLES`].
pub const CREATE_TABLES: &str = "
CREATE TABLE Targets (
    id       INTEGER PRIMARY KEY,
    target   TEXT NOT NULL,
    context1 TEXT NOT NULL,
    context2 TEXT NOT NULL
);

CREATE TABLE Translations (
    id          INTEGER PRIMARY KEY,
    targetId    INTEGER NOT NULL REFERENCES Targets(id),
    translation TEXT NOT NULL,
    model       TEXT NOT NULL,
    numEvals    INTEGER NOT NULL DEFAULT 0  -- derived; see triggers below
);

-- Append-only. One evaluation pass shares an evalId.
CREATE TABLE Rankings (
    id            INTEGER PRIMARY KEY,
    translationId INTEGER NOT NULL REFERENCES Translations(id),
    evalId        INTEGER NOT NULL,
    rank          INTEGER,
    discarded     BOOLEAN NOT NULL DEFAULT 0
);

CREATE INDEX idx_translations_target_id    ON Translations(targetId);
CREATE INDEX idx_translations_num_evals    ON Translations(numEvals, id);
CREATE INDEX idx_translations_evals_target ON Translations(numEvals, targetId, id);
CREATE INDEX idx_rankings_translation_id   ON Rankings(translationId);
CREATE INDEX idx_rankings_eval_id          ON Rankings(evalId);

-- Both triggers set numEvals to the translation's current ranking count.
CREATE TRIGGER update_translation_evals_insert
AFTER INSERT ON Rankings
FOR EACH ROW
BEGIN
    UPDATE Translations
    SET numEvals = (SELECT COUNT(*) FROM Rankings WHERE translationId = NEW.translationId)
    WHERE id = NEW.translationId;
END;

CREATE TRIGGER update_translation_evals_delete
AFTER DELETE ON Rankings
FOR EACH ROW
BEGIN
    UPDATE Translations
    SET numEvals = (SELECT COUNT(*) FROM Rankings WHERE translationId = OLD.translationId)
    WHERE id = OLD.translationId;
END;
";

/// Applied to every read-write connection before any statement runs.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";
