use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Language {
    code: &'static str,
    seasons: &'static [&'static str],
    segments: &'static [&'static str],
    season_sep: &'static str,
    days: &'static [&'static str],
    /// Labels with no season/segment token.
    irregular: &'static [&'static str],
    subjects: &'static [&'static str],
}

const EN: Language = Language {
    code: "en",
    seasons: &["Spring", "Fall", "Spring Fall"],
    segments: &["A", "B", "C", "AB", "BC", "ABC"],
    season_sep: " ",
    days: &["Mon. 1", "Tue. 2", "Wed. 3,4", "Thu. 5", "Fri. 6"],
    irregular: &["Intensive", "Summer Vacation Intensive", "Appointment TBA"],
    subjects: &["Linear Algebra", "Calculus", "Physics", "Chemistry", "Statistics", "Biology"],
};

const JA: Language = Language {
    code: "ja",
    seasons: &["春", "秋", "春秋"],
    segments: &["A", "B", "C", "AB", "BC", "ABC"],
    season_sep: "",
    days: &["月1", "火2", "水3,4", "木5", "金6"],
    irregular: &["集中", "夏季休業中 集中", "応談"],
    subjects: &["線形代数", "微積分", "物理学", "化学", "統計学", "生物学"],
};

fn schedule(lang: &Language, rng: &mut SimpleRng) -> String {
    if rng.next_u64() % 8 == 0 {
        return lang.irregular[(rng.next_u64() % lang.irregular.len() as u64) as usize].to_string();
    }
    format!(
        "{}{}{} {}",
        rng.pick(lang.seasons),
        lang.season_sep,
        rng.pick(lang.segments),
        rng.pick(lang.days)
    )
}

fn list_page(lang: &Language, rng: &mut SimpleRng, n: usize) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<body>\n<table class=\"course-list\">\n\
         <tr><th>Code</th><th>Course</th><th>Schedule</th><th>Credits</th></tr>\n",
        lang.code
    );
    for i in 0..n {
        let stripe = if i % 2 == 0 { "row-odd" } else { "row-even" };
        html.push_str(&format!(
            "<tr class=\"{stripe}\"><td>GB{:04}</td><td>{}</td><td>{}</td><td>{}.0</td></tr>\n",
            1000 + i,
            rng.pick(lang.subjects),
            schedule(lang, rng),
            1 + rng.next_u64() % 3
        ));
    }
    html.push_str("</table>\n</body>\n</html>\n");
    html
}

fn thumbnail_page(lang: &Language, rng: &mut SimpleRng, n: usize) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<body>\n<div class=\"course-thumbnails\">\n",
        lang.code
    );
    for i in 0..n {
        let label = schedule(lang, rng);
        let short = label.split_whitespace().next().unwrap_or("");
        html.push_str(&format!(
            "<div class=\"card\"><h3>GB{:04} {}</h3><p class=\"course-schedule\" title=\"{label}\">{short}</p></div>\n",
            1000 + i,
            rng.pick(lang.subjects)
        ));
    }
    html.push_str(&format!("<div class=\"pager\">1-{n} / {n}</div>\n</div>\n</body>\n</html>\n"));
    html
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let outputs = [
        ("sample_list_en.html", list_page(&EN, &mut rng, 40)),
        ("sample_list_ja.html", list_page(&JA, &mut rng, 40)),
        ("sample_thumbnails_en.html", thumbnail_page(&EN, &mut rng, 24)),
        ("sample_thumbnails_ja.html", thumbnail_page(&JA, &mut rng, 24)),
    ];

    for (path, html) in &outputs {
        std::fs::write(path, html).with_context(|| format!("writing {path}"))?;
        println!("Wrote {path}");
    }
    Ok(())
}
