//! Key based UI strings for English and Urdu.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;

use crate::models::Locale;

const EN: &[(&str, &str)] = &[
    ("nav.home", "Home"),
    ("nav.about", "About"),
    ("nav.prayers", "Prayer Times"),
    ("nav.events", "Events"),
    ("nav.education", "Education"),
    ("nav.donate", "Donate"),
    ("nav.contact", "Contact"),
    ("hero.welcome", "Welcome to"),
    ("hero.mosque", "Faizan e Madina Masjid"),
    ("hero.subtitle", "A place of worship, learning, and community"),
    ("hero.viewPrayers", "View Prayer Times"),
    ("hero.learnMore", "Learn More"),
    ("prayers.title", "Prayer Times"),
    ("prayers.subtitle", "Daily Salah & Iqaamah Schedule"),
    ("prayers.fajr", "Fajr"),
    ("prayers.dhuhr", "Dhuhr"),
    ("prayers.asr", "Asr"),
    ("prayers.maghrib", "Maghrib"),
    ("prayers.isha", "Isha"),
    ("prayers.jumma", "Jumu'ah"),
    ("prayers.iqaamah", "Iqaamah"),
    ("prayers.friday", "Friday Prayer"),
    ("about.title", "About Our Mosque"),
    ("about.mission", "Our Mission"),
    ("about.missionText", "To serve the Muslim community by providing a welcoming space for worship, education, and spiritual growth based on the teachings of the Quran and Sunnah."),
    ("about.vision", "Our Vision"),
    ("about.visionText", "To be a beacon of Islamic knowledge, unity, and service, fostering a strong and vibrant Muslim community."),
    ("about.history", "Our History"),
    ("about.historyText", "Faizan e Madina Masjid was established to serve the growing Muslim community in Iskandrabad Colony. Our mosque continues to grow and serve the community with dedication."),
    ("services.title", "Our Services"),
    ("services.subtitle", "Serving the community in many ways"),
    ("announcements.title", "Announcements"),
    ("announcements.latest", "Latest Updates"),
    ("events.title", "Upcoming Events"),
    ("events.calendar", "Event Calendar"),
    ("events.quranClasses", "Quran Classes"),
    ("events.youthProgram", "Youth Program"),
    ("events.lectures", "Islamic Lectures"),
    ("education.title", "Educational Resources"),
    ("education.subtitle", "Learn and Grow in Faith"),
    ("education.quran", "Quran Studies"),
    ("education.hadith", "Hadith Collection"),
    ("education.fiqh", "Islamic Jurisprudence"),
    ("education.khutbah", "Friday Sermons"),
    ("donate.title", "Support Our Mosque"),
    ("donate.subtitle", "Your contributions help us serve the community"),
    ("donate.zakat", "Zakat"),
    ("donate.sadaqah", "Sadaqah"),
    ("donate.general", "General Donation"),
    ("donate.comingSoon", "Coming Soon"),
    ("donate.comingSoonText", "Online donation portal will be available soon. For now, please donate in person at the mosque."),
    ("gallery.title", "Gallery"),
    ("gallery.subtitle", "A glimpse of our mosque"),
    ("contact.title", "Contact Us"),
    ("contact.address", "Address"),
    ("contact.phone", "Phone"),
    ("contact.email", "Email"),
    ("contact.hours", "Operating Hours"),
    ("contact.openDaily", "Open daily for all prayers"),
    ("contact.sendMessage", "Send Message"),
    ("contact.location", "Iskandrabad Colony"),
    ("contact.name", "Your Name"),
    ("contact.subject", "Subject"),
    ("contact.message", "Message"),
    ("contact.directions", "Get Directions"),
    ("contact.success", "Your message has been received. We will respond soon."),
    ("newsletter.title", "Stay Connected"),
    ("newsletter.subtitle", "Subscribe to our newsletter for updates"),
    ("newsletter.placeholder", "Enter your email"),
    ("newsletter.subscribe", "Subscribe"),
    ("newsletter.success", "You have been added to our newsletter."),
    ("newsletter.already", "This email is already subscribed."),
    ("visitor.title", "Visitor Information"),
    ("visitor.welcome", "Welcome to Faizan e Madina Masjid"),
    ("visitor.dressCode", "Dress Code"),
    ("visitor.dressCodeText", "Please dress modestly. Women are requested to wear hijab."),
    ("visitor.etiquette", "Mosque Etiquette"),
    ("visitor.etiquetteText", "Please turn off mobile phones, speak softly, and maintain cleanliness."),
    ("tasbeeh.title", "Digital Tasbeeh"),
    ("tasbeeh.reset", "Reset"),
    ("tasbeeh.counter", "Counter"),
    ("tasbeeh.target", "Target"),
    ("tasbeeh.count", "Tap to count"),
    ("tasbeeh.completed", "Target reached. May Allah accept it."),
    ("footer.rights", "All Rights Reserved"),
    ("footer.followUs", "Follow Us"),
    ("common.readMore", "Read More"),
    ("common.viewAll", "View All"),
    ("common.comingSoon", "Coming Soon"),
    ("common.noItems", "Nothing to show yet."),
    ("form.required", "Please fill in all required fields."),
    ("form.invalidEmail", "Please enter a valid email address."),
    ("form.failed", "Something went wrong. Please try again later."),
];

const UR: &[(&str, &str)] = &[
    ("nav.home", "ہوم"),
    ("nav.about", "ہمارے بارے میں"),
    ("nav.prayers", "نماز کے اوقات"),
    ("nav.events", "تقریبات"),
    ("nav.education", "تعلیم"),
    ("nav.donate", "عطیات"),
    ("nav.contact", "رابطہ"),
    ("hero.welcome", "خوش آمدید"),
    ("hero.mosque", "فیضان مدینہ مسجد"),
    ("hero.subtitle", "عبادت، علم اور برادری کا مقام"),
    ("hero.viewPrayers", "نماز کے اوقات دیکھیں"),
    ("hero.learnMore", "مزید جانیں"),
    ("prayers.title", "نماز کے اوقات"),
    ("prayers.subtitle", "روزانہ نماز کا شیڈول"),
    ("prayers.fajr", "فجر"),
    ("prayers.dhuhr", "ظہر"),
    ("prayers.asr", "عصر"),
    ("prayers.maghrib", "مغرب"),
    ("prayers.isha", "عشاء"),
    ("prayers.jumma", "جمعہ"),
    ("prayers.iqaamah", "اقامت"),
    ("prayers.friday", "جمعہ کی نماز"),
    ("about.title", "مسجد کے بارے میں"),
    ("about.mission", "ہمارا مقصد"),
    ("about.missionText", "قرآن و سنت کی تعلیمات کی بنیاد پر عبادت، تعلیم اور روحانی ترقی کے لیے خوش آئند جگہ فراہم کرکے مسلم کمیونٹی کی خدمت کرنا۔"),
    ("about.vision", "ہمارا وژن"),
    ("about.visionText", "اسلامی علم، اتحاد اور خدمت کا چراغ بننا، ایک مضبوط اور متحرک مسلم کمیونٹی کو فروغ دینا۔"),
    ("about.history", "ہماری تاریخ"),
    ("about.historyText", "فیضان مدینہ مسجد اسکندر آباد کالونی میں بڑھتی ہوئی مسلم کمیونٹی کی خدمت کے لیے قائم کی گئی۔"),
    ("services.title", "ہماری خدمات"),
    ("services.subtitle", "مختلف طریقوں سے کمیونٹی کی خدمت"),
    ("announcements.title", "اعلانات"),
    ("announcements.latest", "تازہ ترین اپڈیٹس"),
    ("events.title", "آنے والے پروگرام"),
    ("events.calendar", "تقریبات کا کیلنڈر"),
    ("events.quranClasses", "قرآن کی کلاسیں"),
    ("events.youthProgram", "نوجوانان پروگرام"),
    ("events.lectures", "اسلامی لیکچرز"),
    ("education.title", "تعلیمی وسائل"),
    ("education.subtitle", "ایمان میں سیکھیں اور بڑھیں"),
    ("education.quran", "قرآن کا مطالعہ"),
    ("education.hadith", "حدیث کا مجموعہ"),
    ("education.fiqh", "اسلامی فقہ"),
    ("education.khutbah", "جمعہ کے خطبات"),
    ("donate.title", "مسجد کی مدد کریں"),
    ("donate.subtitle", "آپ کے عطیات کمیونٹی کی خدمت میں مدد کرتے ہیں"),
    ("donate.zakat", "زکوٰۃ"),
    ("donate.sadaqah", "صدقہ"),
    ("donate.general", "عام عطیات"),
    ("donate.comingSoon", "جلد آرہا ہے"),
    ("donate.comingSoonText", "آن لائن عطیات کا پورٹل جلد دستیاب ہوگا۔ فی الحال مسجد میں براہ راست عطیہ کریں۔"),
    ("gallery.title", "گیلری"),
    ("gallery.subtitle", "ہماری مسجد کی ایک جھلک"),
    ("contact.title", "ہم سے رابطہ کریں"),
    ("contact.address", "پتہ"),
    ("contact.phone", "فون"),
    ("contact.email", "ای میل"),
    ("contact.hours", "کھلنے کے اوقات"),
    ("contact.openDaily", "تمام نمازوں کے لیے روزانہ کھلا"),
    ("contact.sendMessage", "پیغام بھیجیں"),
    ("contact.location", "اسکندر آباد کالونی"),
    ("contact.name", "آپ کا نام"),
    ("contact.subject", "موضوع"),
    ("contact.message", "پیغام"),
    ("contact.directions", "راستہ دیکھیں"),
    ("contact.success", "آپ کا پیغام موصول ہو گیا ہے۔ ہم جلد جواب دیں گے۔"),
    ("newsletter.title", "جڑے رہیں"),
    ("newsletter.subtitle", "اپڈیٹس کے لیے نیوز لیٹر سبسکرائب کریں"),
    ("newsletter.placeholder", "اپنا ای میل درج کریں"),
    ("newsletter.subscribe", "سبسکرائب"),
    ("newsletter.success", "آپ کو ہمارے نیوز لیٹر میں شامل کر لیا گیا ہے۔"),
    ("newsletter.already", "یہ ای میل پہلے سے سبسکرائب ہے۔"),
    ("visitor.title", "زائرین کی معلومات"),
    ("visitor.welcome", "فیضان مدینہ مسجد میں خوش آمدید"),
    ("visitor.dressCode", "لباس کے اصول"),
    ("visitor.dressCodeText", "براہ کرم با حیا لباس پہنیں۔ خواتین سے حجاب پہننے کی درخواست ہے۔"),
    ("visitor.etiquette", "مسجد کے آداب"),
    ("visitor.etiquetteText", "براہ کرم موبائل فون بند کریں، آہستہ بولیں اور صفائی برقرار رکھیں۔"),
    ("tasbeeh.title", "ڈیجیٹل تسبیح"),
    ("tasbeeh.reset", "ری سیٹ"),
    ("tasbeeh.counter", "گنتی"),
    ("tasbeeh.target", "ہدف"),
    ("tasbeeh.count", "گننے کے لیے دبائیں"),
    ("tasbeeh.completed", "ہدف مکمل ہو گیا۔ اللہ قبول فرمائے۔"),
    ("footer.rights", "تمام حقوق محفوظ ہیں"),
    ("footer.followUs", "ہمیں فالو کریں"),
    ("common.readMore", "مزید پڑھیں"),
    ("common.viewAll", "سب دیکھیں"),
    ("common.comingSoon", "جلد آرہا ہے"),
    ("common.noItems", "ابھی دکھانے کے لیے کچھ نہیں۔"),
    ("form.required", "براہ کرم تمام ضروری خانے پُر کریں۔"),
    ("form.invalidEmail", "براہ کرم درست ای میل درج کریں۔"),
    ("form.failed", "کچھ غلط ہو گیا۔ براہ کرم بعد میں دوبارہ کوشش کریں۔"),
];

type Table = HashMap<&'static str, &'static str>;

static EN_TABLE: OnceLock<Table> = OnceLock::new();
static UR_TABLE: OnceLock<Table> = OnceLock::new();

pub fn table(locale: Locale) -> &'static Table {
    match locale {
        Locale::En => EN_TABLE.get_or_init(|| EN.iter().copied().collect()),
        Locale::Ur => UR_TABLE.get_or_init(|| UR.iter().copied().collect()),
    }
}

pub fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    table(locale).get(key).copied()
}

/// Returns the translated string, or the key itself when it is unknown.
pub fn t<'a>(locale: Locale, key: &'a str) -> &'a str {
    lookup(locale, key).unwrap_or(key)
}

/// Tera filter: `{{ "hero.welcome" | t(lang=lang) }}`.
pub fn translate_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let key = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("the `t` filter expects a string key"))?;
    let locale = args
        .get("lang")
        .and_then(Value::as_str)
        .and_then(Locale::from_code)
        .unwrap_or_default();
    Ok(Value::String(t(locale, key).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_keys_return_table_values() {
        for locale in [Locale::En, Locale::Ur] {
            for (key, value) in table(locale) {
                assert_eq!(t(locale, key), *value);
            }
        }
        assert_eq!(t(Locale::Ur, "prayers.fajr"), "فجر");
    }

    #[test]
    fn absent_keys_return_the_key() {
        for key in ["", "nav", "nav.home.extra", "does.not.exist", "ہوم"] {
            assert_eq!(t(Locale::En, key), key);
            assert_eq!(t(Locale::Ur, key), key);
        }
    }

    #[test]
    fn both_locales_carry_the_same_keys() {
        let mut en: Vec<_> = table(Locale::En).keys().collect();
        let mut ur: Vec<_> = table(Locale::Ur).keys().collect();
        en.sort();
        ur.sort();
        assert_eq!(en, ur);
        assert_eq!(en.len(), EN.len());
    }

    #[test]
    fn filter_reads_the_lang_argument() {
        let mut args = HashMap::new();
        args.insert("lang".to_string(), Value::from("ur"));
        let out = translate_filter(&Value::from("nav.home"), &args).unwrap();
        assert_eq!(out, Value::from("ہوم"));

        let out = translate_filter(&Value::from("nav.home"), &HashMap::new()).unwrap();
        assert_eq!(out, Value::from("Home"));
    }
}
