//! Canned campaign copy returned when generation is unavailable.

use crm_core::types::CampaignType;

const WIN_BACK: [&str; 5] = [
    "1. We've missed you, [Customer Name]! Here's 15% off to welcome you back.",
    "2. [Customer Name], it's been a while. Your favourites are waiting for you.",
    "3. Come back and see what's new, [Customer Name]. Free shipping on your next order.",
    "4. [Customer Name], we saved something special for you. Return this week to claim it.",
    "5. Long time no see, [Customer Name]! Enjoy a little treat on us with your next purchase.",
];

const HIGH_VALUE: [&str; 5] = [
    "1. Thank you for being one of our best customers, [Customer Name]. Enjoy early access to our new collection.",
    "2. [Customer Name], as a valued member you get an exclusive 20% off this week.",
    "3. A VIP gift is waiting for you, [Customer Name]. Claim it on your next order.",
    "4. [Customer Name], your loyalty means everything to us. Here's priority delivery on us.",
    "5. Exclusive for you, [Customer Name]: a private preview of our premium range.",
];

const NEW_PRODUCTS: [&str; 5] = [
    "1. Something new just arrived, [Customer Name]! Be the first to explore it.",
    "2. [Customer Name], our latest collection is here and we picked a few just for you.",
    "3. Fresh arrivals, [Customer Name]! Get 10% off any new product this week.",
    "4. [Customer Name], discover what's new before everyone else.",
    "5. New in store, [Customer Name]: see the products everyone is talking about.",
];

const HOLIDAY: [&str; 5] = [
    "1. Happy holidays, [Customer Name]! Celebrate with 20% off gifts for everyone you love.",
    "2. [Customer Name], our holiday gift guide is ready. Find the perfect present today.",
    "3. Season's greetings, [Customer Name]! Free gift wrapping on all orders this week.",
    "4. [Customer Name], make this holiday special with a festive treat from us.",
    "5. Holiday cheer for you, [Customer Name]: order by Friday for guaranteed delivery.",
];

const SEASONAL: [&str; 5] = [
    "1. A new season is here, [Customer Name]! Refresh your picks with our seasonal range.",
    "2. [Customer Name], get ready for the season with 15% off selected styles.",
    "3. Seasonal favourites are back, [Customer Name]. Shop them before they're gone.",
    "4. [Customer Name], our end-of-season sale starts now. Don't miss out.",
    "5. Fresh for the season, [Customer Name]: handpicked essentials just for you.",
];

const FLASH_SALE: [&str; 5] = [
    "1. Flash sale, [Customer Name]! 30% off everything for the next 24 hours.",
    "2. [Customer Name], hurry! Our flash sale ends at midnight.",
    "3. Today only, [Customer Name]: prices you won't see again.",
    "4. [Customer Name], the clock is ticking. Grab your favourites at flash-sale prices.",
    "5. Quick, [Customer Name]! Limited stock at our lowest prices of the year.",
];

const GENERIC: [&str; 5] = [
    "1. Hello [Customer Name], thank you for being with us!",
    "2. We've missed you, [Customer Name]! Here's something special just for you.",
    "3. [Customer Name], come back and enjoy 10% off on your next order.",
    "4. [Customer Name], we have new offers picked just for you. Take a look today.",
    "5. Thanks for choosing us, [Customer Name]. Here's a little something to say we care.",
];

/// The fixed fallback set for a campaign type.
pub fn fallback_messages(campaign_type: CampaignType) -> Vec<String> {
    let set = match campaign_type {
        CampaignType::WinBack => &WIN_BACK,
        CampaignType::HighValue => &HIGH_VALUE,
        CampaignType::NewProducts => &NEW_PRODUCTS,
        CampaignType::Holiday => &HOLIDAY,
        CampaignType::Seasonal => &SEASONAL,
        CampaignType::FlashSale => &FLASH_SALE,
        CampaignType::Generic => &GENERIC,
    };
    set.iter().map(|s| s.to_string()).collect()
}
