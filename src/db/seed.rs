//! Built-in exam word catalog: seeded once, loaded in position order.

use rusqlite::{params, Connection, Result};

use crate::domain::{WordBank, WordEntry};

/// Insert the built-in catalog if the words table is empty.
pub fn seed_word_bank(conn: &Connection) -> Result<()> {
  let count: i64 = conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
  if count > 0 {
    return Ok(());
  }

  let mut stmt =
    conn.prepare("INSERT INTO words (position, word, meaning) VALUES (?1, ?2, ?3)")?;
  for (position, (word, meaning)) in exam_seed_data().iter().enumerate() {
    stmt.execute(params![position as i64, word, meaning])?;
  }
  Ok(())
}

/// Load the full catalog in position order.
pub fn load_word_bank(conn: &Connection) -> Result<WordBank> {
  let mut stmt = conn.prepare("SELECT word, meaning FROM words ORDER BY position ASC")?;
  let words = stmt
    .query_map([], |row| {
      Ok(WordEntry {
        word: row.get(0)?,
        meaning: row.get(1)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;

  Ok(WordBank::new(words))
}

/// High-frequency vocabulary for the 9th/7th grade civil service English exam.
fn exam_seed_data() -> Vec<(&'static str, &'static str)> {
  vec![
    // Day 1
    ("abate", "약화되다, 누그러지다"),
    ("candid", "솔직한, 거리낌 없는"),
    ("deter", "단념시키다, 막다"),
    ("feasible", "실현 가능한"),
    ("lucid", "명쾌한, 명료한"),
    // Day 2
    ("mitigate", "완화하다, 경감하다"),
    ("obsolete", "쓸모없게 된, 구식의"),
    ("pertinent", "적절한, 관련 있는"),
    ("reticent", "과묵한, 말을 삼가는"),
    ("scrutinize", "면밀히 조사하다"),
    // Day 3
    ("tentative", "잠정적인, 머뭇거리는"),
    ("venerate", "존경하다, 공경하다"),
    ("admonish", "훈계하다, 경고하다"),
    ("benevolent", "자비로운, 인정 많은"),
    ("coherent", "일관성 있는, 논리적인"),
    // Day 4
    ("discrepancy", "불일치, 차이"),
    ("elicit", "이끌어 내다"),
    ("frugal", "절약하는, 검소한"),
    ("hamper", "방해하다"),
    ("impede", "지연시키다, 방해하다"),
    // Day 5
    ("jeopardize", "위태롭게 하다"),
    ("meticulous", "꼼꼼한, 세심한"),
    ("negligible", "무시해도 될 정도의"),
    ("ominous", "불길한"),
    ("plausible", "그럴듯한, 타당해 보이는"),
    // Day 6
    ("reconcile", "화해시키다, 조화시키다"),
    ("stringent", "엄격한, 긴박한"),
    ("transient", "일시적인, 순간적인"),
    ("undermine", "약화시키다, 훼손하다"),
    ("vigilant", "바짝 경계하는"),
    // Day 7
    ("waive", "포기하다, 면제하다"),
    ("allege", "혐의를 제기하다, 주장하다"),
    ("bolster", "강화하다, 북돋우다"),
    ("compel", "강요하다, 강제하다"),
    ("deplete", "고갈시키다"),
    // Day 8
    ("endorse", "지지하다, 승인하다"),
    ("fluctuate", "변동하다, 오르내리다"),
    ("gregarious", "사교적인, 군집성의"),
    ("haphazard", "무계획적인, 되는대로의"),
    ("intricate", "복잡한, 얽힌"),
    // Day 9
    ("lament", "한탄하다, 애도하다"),
    ("mundane", "평범한, 세속적인"),
    ("nullify", "무효화하다"),
    ("oblige", "의무를 지우다, 돕다"),
    ("preclude", "못하게 하다, 배제하다"),
    // Day 10
    ("quarantine", "격리, 격리하다"),
    ("redundant", "불필요한, 쓸모없는"),
    ("subsidize", "보조금을 지급하다"),
    ("thrive", "번창하다, 잘 자라다"),
    ("unanimous", "만장일치의"),
    // Day 11
    ("verdict", "평결, 판단"),
    ("wane", "줄어들다, 약해지다"),
    ("adjourn", "휴회하다, 연기하다"),
    ("breach", "위반, 위반하다"),
    ("concede", "인정하다, 양보하다"),
    // Day 12
    ("defer", "미루다, 따르다"),
    ("eradicate", "근절하다, 뿌리뽑다"),
    ("forfeit", "몰수당하다, 상실하다"),
    ("hinder", "저해하다, 방해하다"),
    ("incessant", "끊임없는"),
  ]
}
