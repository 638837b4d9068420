//! Static bilingual (English/Hindi) string banks. Pure data: every
//! function returns a fixed string for a topic and language. Topic
//! selection lives in [`crate::resolver`]; translation of engine output
//! goes through the dictionary lookups at the bottom of this module.

use crate::models::{HealthStatus, Language, PlantType};

pub fn greeting(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "Hello! I'm AgroBot, your agriculture assistant. How can I help you today with farming information?"
        }
        Language::Hi => {
            "नमस्ते! मैं कृषिबॉट हूँ, आपका कृषि सहायक। आज मैं आपकी कृषि जानकारी के साथ कैसे मदद कर सकता हूं?"
        }
    }
}

pub fn sugarcane_info(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "Sugarcane is a major crop in Uttar Pradesh. It grows best in well-drained, fertile soils with pH 6.5-7.5. For optimal growth, maintain soil moisture, apply balanced fertilization (NPK 150:60:60 kg/ha), and follow integrated pest management."
        }
        Language::Hi => {
            "उत्तर प्रदेश में गन्ना एक प्रमुख फसल है। यह अच्छी जल निकासी वाली, उपजाऊ मिट्टी में pH 6.5-7.5 के साथ सबसे अच्छा बढ़ता है। इष्टतम विकास के लिए, मिट्टी की नमी बनाए रखें, संतुलित उर्वरीकरण (NPK 150:60:60 किग्रा/हेक्टेयर) लागू करें, और एकीकृत कीट प्रबंधन का पालन करें।"
        }
    }
}

pub fn recommend_clay(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "For clay soils in UP, I recommend growing sugarcane, rice, or wheat. Sugarcane grows well in heavy clay soils with good water retention."
        }
        Language::Hi => {
            "यूपी में मिट्टी वाली मिट्टी के लिए, मैं गन्ना, चावल या गेहूं उगाने की सलाह देता हूं। गन्ना अच्छे जल धारण वाली भारी मिट्टी वाली मिट्टी में अच्छी तरह से बढ़ता है।"
        }
    }
}

pub fn recommend_sandy(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "For sandy soils in UP, consider growing pulses, groundnuts, or certain vegetable crops. For sugarcane in sandy soils, you'll need more frequent irrigation and organic matter amendments."
        }
        Language::Hi => {
            "यूपी में बलुई मिट्टी के लिए, दलहन, मूंगफली या कुछ सब्जी फसलों को उगाने पर विचार करें। बलुई मिट्टी में गन्ने के लिए, आपको अधिक बार सिंचाई और जैविक पदार्थ संशोधनों की आवश्यकता होगी।"
        }
    }
}

pub fn recommend_general(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "For crop recommendations, I need more information about your soil type (sandy, clay, loam), rainfall in your area, and irrigation facilities."
        }
        Language::Hi => {
            "फसल की सिफारिशों के लिए, मुझे आपकी मिट्टी के प्रकार (बलुई, मिट्टी, दोमट), आपके क्षेत्र में वर्षा और सिंचाई सुविधाओं के बारे में अधिक जानकारी की आवश्यकता है।"
        }
    }
}

pub fn disease_red_rot(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "Red Rot disease in sugarcane is caused by fungus Colletotrichum falcatum. Look for reddish discoloration inside the stem, leaf yellowing, and wilting. Control by using disease-free seed material, treating setts with fungicides, and removing infected plants."
        }
        Language::Hi => {
            "गन्ने में लाल सड़न रोग कवक कोलेटोट्रिकम फालकेटम के कारण होता है। स्टेम के अंदर लालिमा, पत्तियों का पीलापन और मुरझाने के लिए देखें। रोग मुक्त बीज सामग्री का उपयोग करके, कवकनाशी के साथ सेट्स का इलाज और संक्रमित पौधों को हटाकर नियंत्रण करें।"
        }
    }
}

pub fn disease_smut(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "Smut disease is caused by fungus Ustilago scitaminea. It forms black whip-like structures at growing points. Control by using disease-free material, hot water treatment of setts, and removing infected plants."
        }
        Language::Hi => {
            "कंडुआ रोग कवक अस्टिलागो सिटामिनिया के कारण होता है। यह बढ़ने वाले बिंदुओं पर काले चाबुक जैसी संरचनाएँ बनाता है। रोग मुक्त सामग्री का उपयोग करके, सेट्स के गर्म पानी के उपचार और संक्रमित पौधों को हटाकर नियंत्रण करें।"
        }
    }
}

pub fn disease_general(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "To help identify the disease or pest problem, can you describe the symptoms? Look for discoloration, unusual growth, wilting, or insect presence. You can also use our Disease Detection tool to upload a photo."
        }
        Language::Hi => {
            "रोग या कीट समस्या की पहचान करने में मदद करने के लिए, क्या आप लक्षणों का वर्णन कर सकते हैं? रंग परिवर्तन, असामान्य विकास, मुरझाने या कीटों की उपस्थिति देखें। आप फोटो अपलोड करने के लिए हमारे रोग पहचान उपकरण का भी उपयोग कर सकते हैं।"
        }
    }
}

pub fn irrigation_advice(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "For sugarcane irrigation in UP: Irrigate every 8-10 days during summer months, 15-20 days during winter, and adjust based on rainfall during monsoon. Critical stages for irrigation are germination, tillering, grand growth, and maturity."
        }
        Language::Hi => {
            "यूपी में गन्ने की सिंचाई के लिए: गर्मी के महीनों में हर 8-10 दिनों में, सर्दियों के दौरान 15-20 दिनों में सिंचाई करें, और मानसून के दौरान वर्षा के आधार पर समायोजित करें। सिंचाई के महत्वपूर्ण चरण अंकुरण, टिलरिंग, बड़ा विकास और परिपक्वता हैं।"
        }
    }
}

pub fn fertilizer_advice(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "For sugarcane in UP, apply NPK at 150:60:60 kg/ha in three splits - at planting (30% N, 100% P, 50% K), at 60-70 days (40% N), and at 90-120 days (30% N, 50% K). Also add 10-15 tons/ha of organic manure before planting."
        }
        Language::Hi => {
            "यूपी में गन्ने के लिए, तीन बार में NPK को 150:60:60 किग्रा/हेक्टेयर पर लागू करें - रोपण पर (30% N, 100% P, 50% K), 60-70 दिनों पर (40% N), और 90-120 दिनों पर (30% N, 50% K)। रोपण से पहले 10-15 टन/हेक्टेयर जैविक खाद भी जोड़ें।"
        }
    }
}

pub fn yield_guidance(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "To predict your sugarcane yield, use our Yield Prediction tool. You'll need to provide your district in UP, planted area, soil type, and irrigation details. The average yield in UP ranges from 60-80 tonnes per hectare depending on these factors."
        }
        Language::Hi => {
            "अपने गन्ने की उपज की भविष्यवाणी करने के लिए, हमारे उपज भविष्यवाणी उपकरण का उपयोग करें। आपको यूपी में अपना जिला, लगाए गए क्षेत्र, मिट्टी के प्रकार और सिंचाई विवरण प्रदान करने की आवश्यकता होगी। यूपी में औसत उपज इन कारकों के आधार पर 60-80 टन प्रति हेक्टेयर की रेंज में होती है।"
        }
    }
}

pub fn help_overview(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "Our website has several tools to help farmers: 1) Yield Prediction - estimate your crop production, 2) Disease Detection - identify diseases from leaf images, 3) Weather Display - check local conditions, and 4) This chatbot for agricultural queries. What would you like help with?"
        }
        Language::Hi => {
            "हमारी वेबसाइट में किसानों की मदद के लिए कई उपकरण हैं: 1) उपज भविष्यवाणी - अपनी फसल उत्पादन का अनुमान लगाएं, 2) रोग पहचान - पत्ते की छवियों से रोगों की पहचान करें, 3) मौसम प्रदर्शन - स्थानीय परिस्थितियां जांचें, और 4) कृषि प्रश्नों के लिए यह चैटबोट। आप किस प्रकार की सहायता चाहते हैं?"
        }
    }
}

pub fn planting_advice(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "For planting sugarcane, use disease-free setts with 2-3 buds. Plant in furrows 10-15cm deep, with row spacing of 90-120cm. Ensure proper soil preparation with adequate organic matter."
        }
        Language::Hi => {
            "गन्ना लगाने के लिए, 2-3 आंखों वाले रोग मुक्त सेट्स का उपयोग करें। 10-15 सेमी गहरी नालियों में, 90-120 सेमी पंक्ति दूरी के साथ लगाएं। पर्याप्त जैविक पदार्थ के साथ उचित मिट्टी की तैयारी सुनिश्चित करें।"
        }
    }
}

pub fn harvest_advice(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "Harvest sugarcane when it reaches full maturity, typically 12-18 months after planting. Look for signs like yellow leaves, reduced growth, and optimal Brix level (sugar content). Cut stalks at the base, close to the ground."
        }
        Language::Hi => {
            "गन्ने की कटाई तब करें जब वह पूरी तरह से परिपक्व हो जाए, आमतौर पर लगाने के 12-18 महीने बाद। पीले पत्ते, कम विकास और इष्टतम ब्रिक्स स्तर (चीनी सामग्री) जैसे संकेतों को देखें। तनों को आधार पर, जमीन के पास से काटें।"
        }
    }
}

pub fn default_capabilities(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "I can help with information about crop recommendations, disease identification, irrigation advice, fertilizer recommendations, and agricultural best practices. What specifically would you like to know about?"
        }
        Language::Hi => {
            "मैं फसल सिफारिशों, रोग पहचान, सिंचाई सलाह, उर्वरक सिफारिशों और कृषि सर्वोत्तम अभ्यास के बारे में जानकारी के साथ मदद कर सकता हूं। विशेष रूप से आप किस बारे में जानना चाहेंगे?"
        }
    }
}

/// Generic apology shown when a user-facing turn fails internally. The
/// underlying cause is logged, never rendered.
pub fn apology(lang: Language) -> &'static str {
    match lang {
        Language::En => "I'm sorry, I encountered an error. Please try again later.",
        Language::Hi => "मुझे खेद है, मुझे एक त्रुटि मिली। कृपया बाद में पुनः प्रयास करें।",
    }
}

pub fn image_apology(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "I'm sorry, I encountered an error processing your image. Please try again later."
        }
        Language::Hi => {
            "मुझे खेद है, आपकी छवि को संसाधित करने में मुझे एक त्रुटि मिली। कृपया बाद में पुनः प्रयास करें।"
        }
    }
}

/// Shown when the remote assistant answered with no usable text blocks.
pub fn remote_unparsed(lang: Language) -> &'static str {
    match lang {
        Language::En => "I'm sorry, I couldn't process that request.",
        Language::Hi => "मुझे खेद है, मैं उस अनुरोध को संसाधित नहीं कर सका।",
    }
}

pub fn training_hint(lang: Language) -> &'static str {
    match lang {
        Language::En => {
            "For more accurate plant identification, consider training the model with your own plant images."
        }
        Language::Hi => {
            "अधिक सटीक पौधों की पहचान के लिए, अपनी खुद की पौधों की छवियों के साथ मॉडल को प्रशिक्षित करने पर विचार करें।"
        }
    }
}

pub fn plant_name(plant: PlantType, lang: Language) -> &'static str {
    if lang == Language::En {
        return plant.as_str();
    }
    match plant {
        PlantType::Sugarcane => "गन्ना",
        PlantType::Wheat => "गेहूं",
        PlantType::Rice => "चावल",
        PlantType::Maize => "मक्का",
        PlantType::Potato => "आलू",
        PlantType::Tomato => "टमाटर",
        PlantType::Cotton => "कपास",
        PlantType::Pulses => "दलहन",
        PlantType::Mustard => "सरसों",
        PlantType::Soybean => "सोयाबीन",
    }
}

pub fn health_label(status: HealthStatus, lang: Language) -> &'static str {
    if lang == Language::En {
        return status.label_en();
    }
    match status {
        HealthStatus::Healthy => "स्वस्थ",
        HealthStatus::MinorIssues => "मामूली समस्याएं",
        HealthStatus::PossibleDisease => "संभावित रोग",
        HealthStatus::NeedsAttention => "ध्यान देने की आवश्यकता है",
    }
}

/// Disease-name dictionary. Unknown entries pass through unchanged so a
/// growing disease table never breaks Hindi output.
pub fn translate_disease(disease: &str, lang: Language) -> String {
    if lang == Language::En {
        return disease.to_string();
    }
    let translated = match disease {
        "red rot" => "लाल सड़न",
        "smut" => "कंडुआ",
        "rust" => "रतुआ",
        "leaf scald" => "पत्ती झुलसा",
        "powdery mildew" => "चूर्णिल आसिता",
        "loose smut" => "ढीला कंडुआ",
        "leaf blight" => "पत्ती झुलसा",
        "blast" => "झोंका",
        "blight" => "झुलसा",
        "sheath blight" => "आवरण झुलसा",
        "bacterial leaf streak" => "बैक्टीरियल पत्ती धारी",
        "stalk rot" => "तना सड़न",
        "late blight" => "लेट झुलसा",
        "early blight" => "अर्ली झुलसा",
        "black scurf" => "काला पपड़ी",
        "viral infection" => "वायरल संक्रमण",
        other => other,
    };
    translated.to_string()
}

pub const REC_CONTINUE_CARE: &str = "Continue regular care and monitoring";
pub const REC_CHECK_IRRIGATION: &str = "Check irrigation levels";
pub const REC_MONITOR_PESTS: &str = "Monitor for pest activity";
pub const REC_APPLY_TREATMENT: &str = "Consider applying appropriate fungicide/pesticide";
pub const REC_CONSULT_EXPERT: &str = "Consult with local agricultural extension office";
pub const REC_ISOLATE_PLANTS: &str = "Isolate affected plants if possible";

pub fn translate_recommendation(recommendation: &str, lang: Language) -> String {
    if lang == Language::En {
        return recommendation.to_string();
    }
    let translated = match recommendation {
        REC_CONTINUE_CARE => "नियमित देखभाल और निगरानी जारी रखें",
        REC_CHECK_IRRIGATION => "सिंचाई के स्तर की जांच करें",
        REC_MONITOR_PESTS => "कीट गतिविधि के लिए निगरानी करें",
        REC_APPLY_TREATMENT => "उपयुक्त फफूंदीनाशक/कीटनाशक लगाने पर विचार करें",
        REC_CONSULT_EXPERT => "स्थानीय कृषि विस्तार कार्यालय से परामर्श करें",
        REC_ISOLATE_PLANTS => "यदि संभव हो तो प्रभावित पौधों को अलग करें",
        other => other,
    };
    translated.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_disease_passes_through() {
        assert_eq!(translate_disease("wilt complex", Language::Hi), "wilt complex");
        assert_eq!(translate_disease("red rot", Language::Hi), "लाल सड़न");
    }

    #[test]
    fn english_is_identity_for_dictionaries() {
        assert_eq!(translate_disease("smut", Language::En), "smut");
        assert_eq!(
            translate_recommendation(REC_CONSULT_EXPERT, Language::En),
            REC_CONSULT_EXPERT
        );
        assert_eq!(plant_name(PlantType::Wheat, Language::En), "wheat");
    }

    #[test]
    fn hindi_health_labels_cover_all_levels() {
        for status in HealthStatus::ALL {
            assert!(!health_label(status, Language::Hi).is_empty());
        }
    }
}
