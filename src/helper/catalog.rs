//! Built-in site content.
//!
//! Store-backed kinds (prayer times, announcements, events, resources) are
//! seeded from here by `setup_cli db setup` and used as a fallback when the
//! store cannot be read. Everything else is rendered straight from these
//! tables.

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};

use crate::models::{
    Announcement, AnnouncementType, Collection, EducationalResource, Event, EventCategory, Locale,
    NewAnnouncement, NewEvent, NewPrayerTime, NewRecord, NewResource, PrayerTime, RecordKind,
    ResourceCategory,
};

pub const MOSQUE_LOCATION: &str = "Faizan e Madina Masjid, Iskandrabad Colony";
pub const JUMUAH_TIME: &str = "2:00 PM";
pub const PHONE_DISPLAY: &str = "+92 300 0671272";
pub const PHONE_HREF: &str = "tel:+923000671272";
pub const EMAIL: &str = "sulemanhyder2@gmail.com";
pub const MAP_URL: &str = "https://www.google.com/maps/search/?api=1&query=Fiazan-E-Madina+Masjid+Iskandar+Abad";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bilingual {
    pub en: &'static str,
    pub ur: &'static str,
}

impl Bilingual {
    pub const fn new(en: &'static str, ur: &'static str) -> Self {
        Bilingual { en, ur }
    }

    pub fn get(&self, locale: Locale) -> &'static str {
        locale.pick(self.en, self.ur)
    }
}

pub struct CatalogPrayer {
    /// Translation key suffix under `prayers.`.
    pub key: &'static str,
    pub name: &'static str,
    pub time: &'static str,
}

pub const PRAYERS: [CatalogPrayer; 5] = [
    CatalogPrayer { key: "fajr", name: "Fajr", time: "6:30 AM" },
    CatalogPrayer { key: "dhuhr", name: "Dhuhr", time: "1:30 PM" },
    CatalogPrayer { key: "asr", name: "Asr", time: "4:45 PM" },
    CatalogPrayer { key: "maghrib", name: "Maghrib", time: "6:10 PM" },
    CatalogPrayer { key: "isha", name: "Isha", time: "8:00 PM" },
];

/// Position of a prayer in the day. Names the schedule does not know sort last.
pub fn prayer_rank(name: &str) -> usize {
    let lower = name.trim().to_lowercase();
    PRAYERS
        .iter()
        .position(|p| p.key == lower)
        .unwrap_or(PRAYERS.len())
}

pub struct CatalogAnnouncement {
    pub kind: AnnouncementType,
    pub title: Bilingual,
    pub content: Bilingual,
}

pub const ANNOUNCEMENTS: [CatalogAnnouncement; 3] = [
    CatalogAnnouncement {
        kind: AnnouncementType::Urgent,
        title: Bilingual::new("Ramadan Schedule 2024", "رمضان شیڈول 2024"),
        content: Bilingual::new(
            "Special Tarawih prayers will begin after Isha. Please check the updated timings.",
            "تراویح کی خصوصی نماز عشاء کے بعد شروع ہوگی۔ براہ کرم اپڈیٹ شدہ اوقات چیک کریں۔",
        ),
    },
    CatalogAnnouncement {
        kind: AnnouncementType::Event,
        title: Bilingual::new("Weekly Quran Class", "ہفتہ وار قرآن کلاس"),
        content: Bilingual::new(
            "Join us every Saturday after Maghrib for Quran Tafseer class with the Imam.",
            "ہر ہفتے کو مغرب کے بعد امام صاحب کے ساتھ قرآن تفسیر کلاس میں شامل ہوں۔",
        ),
    },
    CatalogAnnouncement {
        kind: AnnouncementType::Info,
        title: Bilingual::new("Mosque Renovation Update", "مسجد کی تزئین و آرائش"),
        content: Bilingual::new(
            "Wudu area renovation is in progress. Please use the temporary facilities.",
            "وضو خانے کی تزئین و آرائش جاری ہے۔ براہ کرم عارضی سہولیات استعمال کریں۔",
        ),
    },
];

pub struct CatalogEvent {
    pub title: Bilingual,
    pub description: Bilingual,
    /// `None` means the event runs daily.
    pub day: Option<Weekday>,
    pub time: &'static str,
    pub category: EventCategory,
}

pub const EVENTS: [CatalogEvent; 4] = [
    CatalogEvent {
        title: Bilingual::new("Weekly Quran Classes", "ہفتہ وار قرآن کلاس"),
        description: Bilingual::new(
            "Learn Quran recitation and Tajweed with qualified teachers.",
            "تجوید کے ساتھ قرآن کی تلاوت سیکھیں۔",
        ),
        day: Some(Weekday::Sat),
        time: "After Maghrib",
        category: EventCategory::Education,
    },
    CatalogEvent {
        title: Bilingual::new("Friday Sermon (Khutbah)", "جمعہ کا خطبہ"),
        description: Bilingual::new(
            "Join us for the weekly Friday prayer and inspiring sermon.",
            "ہفتہ وار جمعہ کی نماز اور پُراثر خطبے میں شامل ہوں۔",
        ),
        day: Some(Weekday::Fri),
        time: "2:00 PM",
        category: EventCategory::Prayer,
    },
    CatalogEvent {
        title: Bilingual::new("Youth Program", "نوجوانان پروگرام"),
        description: Bilingual::new(
            "Islamic education and activities for young Muslims.",
            "نوجوان مسلمانوں کے لیے اسلامی تعلیم اور سرگرمیاں۔",
        ),
        day: Some(Weekday::Sun),
        time: "10:00 AM",
        category: EventCategory::Youth,
    },
    CatalogEvent {
        title: Bilingual::new("Children Hifz Program", "بچوں کا حفظ پروگرام"),
        description: Bilingual::new(
            "Quran memorization program for children with experienced teachers.",
            "تجربہ کار اساتذہ کے ساتھ بچوں کے لیے قرآن حفظ پروگرام۔",
        ),
        day: None,
        time: "After Fajr",
        category: EventCategory::Education,
    },
];

pub struct CatalogResource {
    pub title: Bilingual,
    pub description: Bilingual,
    pub category: ResourceCategory,
}

pub const RESOURCES: [CatalogResource; 4] = [
    CatalogResource {
        title: Bilingual::new("Quran Studies", "قرآن کا مطالعہ"),
        description: Bilingual::new(
            "Learn Quran recitation, Tajweed, and Tafseer with our comprehensive resources.",
            "ہماری جامع وسائل کے ساتھ قرآن کی تلاوت، تجوید اور تفسیر سیکھیں۔",
        ),
        category: ResourceCategory::Quran,
    },
    CatalogResource {
        title: Bilingual::new("Hadith Collection", "حدیث کا مجموعہ"),
        description: Bilingual::new(
            "Authentic Hadith collections from Sahih Bukhari, Muslim, and more.",
            "صحیح بخاری، مسلم اور دیگر سے مستند احادیث کا مجموعہ۔",
        ),
        category: ResourceCategory::Hadith,
    },
    CatalogResource {
        title: Bilingual::new("Friday Sermons", "جمعہ کے خطبات"),
        description: Bilingual::new(
            "Audio and video recordings of Friday Khutbahs.",
            "جمعہ کے خطبات کی آڈیو اور ویڈیو ریکارڈنگز۔",
        ),
        category: ResourceCategory::General,
    },
    CatalogResource {
        title: Bilingual::new("Islamic Lectures", "اسلامی لیکچرز"),
        description: Bilingual::new(
            "Educational videos and lectures on various Islamic topics.",
            "مختلف اسلامی موضوعات پر تعلیمی ویڈیوز اور لیکچرز۔",
        ),
        category: ResourceCategory::Fiqh,
    },
];

pub struct TitledText {
    pub title: Bilingual,
    pub text: Bilingual,
}

pub const DONATIONS: [TitledText; 3] = [
    TitledText {
        title: Bilingual::new("Zakat", "زکوٰۃ"),
        text: Bilingual::new("Fulfill your obligatory charity for eligible recipients.", "مستحقین کے لیے اپنی فرض صدقہ ادا کریں۔"),
    },
    TitledText {
        title: Bilingual::new("Sadaqah", "صدقہ"),
        text: Bilingual::new("Voluntary charity for the pleasure of Allah.", "اللہ کی رضا کے لیے نفلی صدقہ۔"),
    },
    TitledText {
        title: Bilingual::new("General Fund", "عام فنڈ"),
        text: Bilingual::new("Support mosque operations and maintenance.", "مسجد کے انتظام اور دیکھ بھال میں مدد کریں۔"),
    },
];

pub const VISITOR_GUIDELINES: [TitledText; 4] = [
    TitledText {
        title: Bilingual::new("Dress Code", "لباس کے اصول"),
        text: Bilingual::new(
            "Please dress modestly. Men should wear clothing that covers from navel to knees. Women are requested to wear hijab and loose-fitting clothing.",
            "براہ کرم با حیا لباس پہنیں۔ مردوں کے لیے ناف سے گھٹنوں تک ڈھکا لباس ضروری ہے۔ خواتین سے حجاب اور ڈھیلا لباس پہننے کی درخواست ہے۔",
        ),
    },
    TitledText {
        title: Bilingual::new("Maintain Silence", "خاموشی برقرار رکھیں"),
        text: Bilingual::new(
            "Please keep your voice low inside the mosque. Avoid loud conversations, especially during prayer times.",
            "براہ کرم مسجد کے اندر آہستہ بولیں۔ بلند آواز سے گفتگو سے گریز کریں، خاص طور پر نماز کے اوقات میں۔",
        ),
    },
    TitledText {
        title: Bilingual::new("Mobile Phones", "موبائل فون"),
        text: Bilingual::new(
            "Please switch off or silence your mobile phones before entering the prayer area.",
            "براہ کرم نماز کی جگہ میں داخل ہونے سے پہلے اپنے موبائل فون بند یا خاموش کر دیں۔",
        ),
    },
    TitledText {
        title: Bilingual::new("Respect & Cleanliness", "احترام اور صفائی"),
        text: Bilingual::new(
            "Please maintain cleanliness and respect for the sacred space. Perform wudu before prayers.",
            "براہ کرم صفائی اور مقدس جگہ کا احترام برقرار رکھیں۔ نماز سے پہلے وضو کریں۔",
        ),
    },
];

pub const SERVICES: [TitledText; 6] = [
    TitledText {
        title: Bilingual::new("Quran Classes", "قرآن کی کلاسیں"),
        text: Bilingual::new("Daily Quran recitation and Tajweed classes for all ages", "تمام عمر کے لیے روزانہ قرآن کی تلاوت اور تجوید کی کلاسیں"),
    },
    TitledText {
        title: Bilingual::new("Islamic Studies", "اسلامی تعلیم"),
        text: Bilingual::new("Comprehensive Islamic education programs", "مکمل اسلامی تعلیمی پروگرام"),
    },
    TitledText {
        title: Bilingual::new("Community Support", "کمیونٹی سپورٹ"),
        text: Bilingual::new("Assistance for families and individuals in need", "ضرورت مند خاندانوں اور افراد کی مدد"),
    },
    TitledText {
        title: Bilingual::new("Youth Programs", "نوجوانوں کے پروگرام"),
        text: Bilingual::new("Engaging activities for youth development", "نوجوانوں کی ترقی کے لیے دلچسپ سرگرمیاں"),
    },
    TitledText {
        title: Bilingual::new("Weekly Programs", "ہفتہ وار پروگرام"),
        text: Bilingual::new("Regular lectures, study circles, and gatherings", "باقاعدہ لیکچرز، دروس اور اجتماعات"),
    },
    TitledText {
        title: Bilingual::new("Community Meals", "اجتماعی کھانا"),
        text: Bilingual::new("Free meals during Ramadan and special occasions", "رمضان اور خاص مواقع پر مفت کھانا"),
    },
];

/// Translation keys for the about cards: (title, text).
pub const ABOUT_SECTIONS: [(&str, &str); 3] = [
    ("about.mission", "about.missionText"),
    ("about.vision", "about.visionText"),
    ("about.history", "about.historyText"),
];

pub struct GalleryItem {
    pub title: Bilingual,
    pub image: &'static str,
}

pub const GALLERY: [GalleryItem; 6] = [
    GalleryItem { title: Bilingual::new("Main Prayer Hall", "مرکزی نماز ہال"), image: "https://images.unsplash.com/photo-1591604466107-ec97de577aff?w=800&h=600&fit=crop" },
    GalleryItem { title: Bilingual::new("Mihrab & Minbar", "محراب اور منبر"), image: "https://images.unsplash.com/photo-1584551246679-0daf3d275d0f?w=800&h=600&fit=crop" },
    GalleryItem { title: Bilingual::new("Dome Architecture", "گنبد تعمیرات"), image: "https://images.unsplash.com/photo-1564769610735-6f44e5f5268d?w=800&h=600&fit=crop" },
    GalleryItem { title: Bilingual::new("Evening View", "شام کا منظر"), image: "https://images.unsplash.com/photo-1542816417-0983c9c9ad53?w=800&h=600&fit=crop" },
    GalleryItem { title: Bilingual::new("Calligraphy Wall", "خطاطی کی دیوار"), image: "https://images.unsplash.com/photo-1609599006353-e629aaabfeae?w=800&h=600&fit=crop" },
    GalleryItem { title: Bilingual::new("Community Gathering", "اجتماع"), image: "https://images.unsplash.com/photo-1583932866134-37068a71b6c4?w=800&h=600&fit=crop" },
];

pub struct TasbeehPhrase {
    pub arabic: &'static str,
    pub transliteration: &'static str,
    pub meaning: &'static str,
}

pub const TASBEEH_PHRASES: [TasbeehPhrase; 4] = [
    TasbeehPhrase { arabic: "سُبْحَانَ اللَّهِ", transliteration: "SubhanAllah", meaning: "Glory be to Allah" },
    TasbeehPhrase { arabic: "الْحَمْدُ لِلَّهِ", transliteration: "Alhamdulillah", meaning: "Praise be to Allah" },
    TasbeehPhrase { arabic: "اللَّهُ أَكْبَرُ", transliteration: "Allahu Akbar", meaning: "Allah is the Greatest" },
    TasbeehPhrase { arabic: "لَا إِلَٰهَ إِلَّا اللَّهُ", transliteration: "La ilaha illallah", meaning: "There is no god but Allah" },
];

/// First date on or after `from` that falls on `day`.
pub fn next_weekday(from: NaiveDate, day: Weekday) -> NaiveDate {
    let ahead = (7 + day.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from + Duration::days(ahead as i64)
}

/// Insert payloads for one kind, with event dates resolved against `today`.
pub fn seed_records(kind: RecordKind, today: NaiveDate) -> Vec<NewRecord> {
    match kind {
        RecordKind::Announcement => ANNOUNCEMENTS
            .iter()
            .map(|a| NewRecord::Announcement(NewAnnouncement {
                title_en: a.title.en.to_string(),
                title_ur: a.title.ur.to_string(),
                content_en: a.content.en.to_string(),
                content_ur: a.content.ur.to_string(),
                kind: a.kind,
                is_active: true,
            }))
            .collect(),
        RecordKind::Event => EVENTS
            .iter()
            .map(|e| NewRecord::Event(NewEvent {
                title_en: e.title.en.to_string(),
                title_ur: e.title.ur.to_string(),
                description_en: e.description.en.to_string(),
                description_ur: e.description.ur.to_string(),
                event_date: e.day.map_or(today, |d| next_weekday(today, d)).format("%Y-%m-%d").to_string(),
                event_time: e.time.to_string(),
                location: MOSQUE_LOCATION.to_string(),
                category: e.category,
                is_active: true,
            }))
            .collect(),
        RecordKind::Resource => RESOURCES
            .iter()
            .map(|r| NewRecord::Resource(NewResource {
                title_en: r.title.en.to_string(),
                title_ur: r.title.ur.to_string(),
                description_en: r.description.en.to_string(),
                description_ur: r.description.ur.to_string(),
                category: r.category,
                resource_url: None,
                is_active: true,
            }))
            .collect(),
        RecordKind::PrayerTime => PRAYERS
            .iter()
            .map(|p| NewRecord::PrayerTime(NewPrayerTime {
                prayer_name: p.name.to_string(),
                iqamah_time: p.time.to_string(),
                is_active: true,
            }))
            .collect(),
    }
}

/// The catalog rendered as store records, for when the store is unreachable.
pub fn fallback_collection(kind: RecordKind, today: NaiveDate) -> Collection {
    let now = Utc::now();
    let id = |i: usize| format!("catalog-{}-{}", kind.slug(), i);
    let records = seed_records(kind, today).into_iter().enumerate();
    match kind {
        RecordKind::Announcement => Collection::Announcements(records.filter_map(|(i, r)| match r {
            NewRecord::Announcement(a) => Some(Announcement {
                id: id(i), title_en: a.title_en, title_ur: a.title_ur, content_en: a.content_en,
                content_ur: a.content_ur, kind: a.kind, is_active: a.is_active, created_at: now,
            }),
            _ => None,
        }).collect()),
        RecordKind::Event => Collection::Events(records.filter_map(|(i, r)| match r {
            NewRecord::Event(e) => Some(Event {
                id: id(i), title_en: e.title_en, title_ur: e.title_ur, description_en: e.description_en,
                description_ur: e.description_ur, event_date: e.event_date, event_time: e.event_time,
                location: e.location, category: e.category, is_active: e.is_active,
            }),
            _ => None,
        }).collect()),
        RecordKind::Resource => Collection::Resources(records.filter_map(|(i, r)| match r {
            NewRecord::Resource(r) => Some(EducationalResource {
                id: id(i), title_en: r.title_en, title_ur: r.title_ur, description_en: r.description_en,
                description_ur: r.description_ur, category: r.category, resource_url: r.resource_url,
                is_active: r.is_active, created_at: now,
            }),
            _ => None,
        }).collect()),
        RecordKind::PrayerTime => Collection::PrayerTimes(records.filter_map(|(i, r)| match r {
            NewRecord::PrayerTime(p) => Some(PrayerTime {
                id: id(i), prayer_name: p.prayer_name, iqamah_time: p.iqamah_time, is_active: p.is_active,
            }),
            _ => None,
        }).collect()),
    }
}
